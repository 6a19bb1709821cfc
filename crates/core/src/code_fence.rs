//! Code fence detection shared by the delimiter scanner, the section
//! collector, and the block processor.
//!
//! All three consult the same tracker so a line is never a fence to one
//! layer and plain text to another.

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// An opening fence run: the repeated character and how many times it repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMarker {
    /// Fence character (`` ` `` or `~`).
    pub ch: char,
    /// Run length (always >= 3).
    pub len: usize,
}

impl FenceMarker {
    /// Returns true if `line` closes a fence opened with this marker.
    ///
    /// The closer must use the same character, be at least as long, and carry
    /// nothing but whitespace after the run.
    pub fn is_closed_by(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let run = trimmed.chars().take_while(|c| *c == self.ch).count();
        run >= self.len && trimmed[run * self.ch.len_utf8()..].trim().is_empty()
    }
}

/// Current fence state (phase and the marker that opened it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Marker recorded at opening.
    pub marker: Option<FenceMarker>,
}

/// Outcome of processing a single line for fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParseOutcome {
    /// State to carry into the next line.
    pub next_state: FenceState,
    /// Whether this line belongs to a fence (opener, content, or closer).
    /// Delimiter lines must not be classified when this is set.
    pub in_fence: bool,
}

/// Advance fence state based on a single line of text.
pub fn advance_fence_state(line: &str, state: FenceState) -> LineParseOutcome {
    match (state.phase, state.marker) {
        (FencePhase::InsideFence, Some(marker)) => {
            let next_state = if marker.is_closed_by(line) {
                FenceState::default()
            } else {
                state
            };
            LineParseOutcome {
                next_state,
                in_fence: true,
            }
        }
        _ => match detect_fence(line) {
            Some((marker, _)) => LineParseOutcome {
                next_state: FenceState {
                    phase: FencePhase::InsideFence,
                    marker: Some(marker),
                },
                in_fence: true,
            },
            None => LineParseOutcome {
                next_state: FenceState::default(),
                in_fence: false,
            },
        },
    }
}

/// Detects a fence opener, returning its marker and the trimmed info string.
///
/// Leading indentation is ignored. Backtick fences may not carry a backtick
/// in their info string.
pub fn detect_fence(line: &str) -> Option<(FenceMarker, &str)> {
    let trimmed = line.trim();
    let first = trimmed.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let len = trimmed.chars().take_while(|c| *c == first).count();
    if len < 3 {
        return None;
    }
    let info = trimmed[len..].trim();
    if first == '`' && info.contains('`') {
        return None;
    }
    Some((FenceMarker { ch: first, len }, info))
}
