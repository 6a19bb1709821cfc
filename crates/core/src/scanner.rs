//! Fence-aware component delimiter scanner.
//!
//! Splits raw text into plain markdown runs and `:::type{attrs} ... :::`
//! component spans. Delimiter lines are classified only outside code fences;
//! fence state and nesting depth are tracked independently and both are
//! consulted for every line.

use crate::attrs::Attributes;
use crate::ast::CalloutKind;
use crate::code_fence::{FencePhase, FenceState, advance_fence_state};
use crate::error::{ParseDiagnostics, ParseWarning, SourceLocation};

/// The closed set of component types, plus a passthrough for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentKind {
    /// `tip`, `info`, `warn`
    Callout(CalloutKind),
    /// `cards`
    Cards,
    /// `decision-grid`
    DecisionGrid,
    /// `command`
    Command,
    /// `accordion`
    Accordion,
    /// `pipeline`
    Pipeline,
    /// `hero`
    Hero,
    /// Any other name; rendered verbatim.
    Unknown(String),
}

impl ComponentKind {
    /// Resolves a type name from an opener line.
    pub fn from_name(name: &str) -> Self {
        match name {
            "tip" => ComponentKind::Callout(CalloutKind::Tip),
            "info" => ComponentKind::Callout(CalloutKind::Info),
            "warn" => ComponentKind::Callout(CalloutKind::Warn),
            "cards" => ComponentKind::Cards,
            "decision-grid" => ComponentKind::DecisionGrid,
            "command" => ComponentKind::Command,
            "accordion" => ComponentKind::Accordion,
            "pipeline" => ComponentKind::Pipeline,
            "hero" => ComponentKind::Hero,
            other => ComponentKind::Unknown(other.to_string()),
        }
    }

    /// The type name as written in source.
    pub fn name(&self) -> &str {
        match self {
            ComponentKind::Callout(kind) => kind.as_str(),
            ComponentKind::Cards => "cards",
            ComponentKind::DecisionGrid => "decision-grid",
            ComponentKind::Command => "command",
            ComponentKind::Accordion => "accordion",
            ComponentKind::Pipeline => "pipeline",
            ComponentKind::Hero => "hero",
            ComponentKind::Unknown(name) => name,
        }
    }
}

/// Parsed representation of an opener line (e.g. `:::command{title="build"}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentOpening {
    /// Resolved component type.
    pub kind: ComponentKind,
    /// Attributes from the `{...}` group.
    pub attrs: Attributes,
    /// Trailing text after the type and attributes.
    pub inline_title: Option<String>,
}

/// A recognized component block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpan {
    /// Parsed opener.
    pub opening: ComponentOpening,
    /// The opener line exactly as written.
    pub opener_line: String,
    /// Lines between the opener and its closer.
    pub body: Vec<String>,
    /// 1-indexed line of the opener in the document.
    pub line: usize,
    /// False when EOF was reached before the matching `:::`.
    pub closed: bool,
}

impl ComponentSpan {
    /// Body lines joined with newlines.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }

    /// Document line of the first body line.
    pub fn body_line(&self) -> usize {
        self.line + 1
    }
}

/// Output of the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span<'a> {
    /// Plain markdown lines.
    Plain {
        /// Lines of the run.
        lines: Vec<&'a str>,
        /// 1-indexed line of the first entry.
        line: usize,
    },
    /// A component block.
    Component(ComponentSpan),
}

/// Parses an opener line like `:::hero{badge="v2"}` or `:::tip Heads up`.
///
/// The type name starts with a lowercase ASCII letter and continues with
/// lowercase letters, digits, or hyphens. A bare `:::` is not an opener.
pub fn parse_opening(line: &str) -> Option<ComponentOpening> {
    let rest = line.trim().strip_prefix(":::")?;
    let name_len = component_name_len(rest)?;
    let name = &rest[..name_len];
    let mut rest = rest[name_len..].trim_start();

    let mut attrs = Attributes::new();
    if rest.starts_with('{')
        && let Some(close) = rest.find('}')
    {
        attrs = Attributes::parse(&rest[..=close]);
        rest = rest[close + 1..].trim_start();
    }

    let inline_title = Some(rest.trim()).filter(|t| !t.is_empty()).map(str::to_string);

    Some(ComponentOpening {
        kind: ComponentKind::from_name(name),
        attrs,
        inline_title,
    })
}

/// Check if a line is a component closer (`:::`).
pub fn is_closer(line: &str) -> bool {
    line.trim() == ":::"
}

fn component_name_len(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_lowercase() => {}
        _ => return None,
    }
    let len = chars
        .find(|(_, c)| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        .map_or(rest.len(), |(i, _)| i);
    Some(len)
}

/// Splits `input` into plain runs and component spans.
///
/// `first_line` is the document line number of the first input line, so
/// recursive scans of component bodies report absolute positions. An
/// unclosed component keeps every remaining line as its body and records an
/// [`ParseWarning::UnclosedComponent`].
pub fn scan<'a>(
    input: &'a str,
    first_line: usize,
    diagnostics: &mut ParseDiagnostics,
) -> Vec<Span<'a>> {
    let lines: Vec<&str> = input.lines().collect();
    let mut spans = Vec::new();
    let mut plain: Vec<&str> = Vec::new();
    let mut plain_start = first_line;
    let mut fence = FenceState::default();
    let mut fence_line = first_line;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let outcome = advance_fence_state(line, fence);
        if outcome.in_fence {
            if fence.phase == FencePhase::Outside {
                fence_line = first_line + i;
            }
            fence = outcome.next_state;
            plain.push(line);
            i += 1;
            continue;
        }

        let Some(opening) = parse_opening(line) else {
            if is_closer(line) {
                diagnostics.add_warning_at(
                    "Stray ::: with no open component block",
                    first_line + i,
                    1,
                );
            }
            plain.push(line);
            i += 1;
            continue;
        };

        if !plain.is_empty() {
            spans.push(Span::Plain {
                lines: std::mem::take(&mut plain),
                line: plain_start,
            });
        }

        let line_no = first_line + i;
        let (body, closed, consumed) = collect_body(&lines[i + 1..]);
        if !closed {
            diagnostics.add_warning(ParseWarning::UnclosedComponent {
                location: SourceLocation::new(line_no, 1),
                name: opening.kind.name().to_string(),
            });
        }

        spans.push(Span::Component(ComponentSpan {
            opening,
            opener_line: line.to_string(),
            body,
            line: line_no,
            closed,
        }));
        i += 1 + consumed;
        plain_start = first_line + i;
    }

    if let (FencePhase::InsideFence, Some(marker)) = (fence.phase, fence.marker) {
        let context = lines
            .get(fence_line - first_line)
            .map(|l| l.trim().to_string())
            .unwrap_or_default();
        diagnostics.add_warning(ParseWarning::UnclosedCodeFence {
            location: SourceLocation::new(fence_line, 1),
            marker: marker.ch,
            context,
        });
    }

    if !plain.is_empty() {
        spans.push(Span::Plain {
            lines: plain,
            line: plain_start,
        });
    }

    spans
}

/// Collects body lines up to the closer matching depth 1.
///
/// Returns the body, whether the closer was found, and how many lines were
/// consumed (closer included).
fn collect_body(lines: &[&str]) -> (Vec<String>, bool, usize) {
    let mut depth = 1usize;
    let mut fence = FenceState::default();
    let mut body = Vec::new();

    for (offset, line) in lines.iter().enumerate() {
        let outcome = advance_fence_state(line, fence);
        fence = outcome.next_state;

        if !outcome.in_fence {
            if is_closer(line) {
                depth -= 1;
                if depth == 0 {
                    return (body, true, offset + 1);
                }
            } else if parse_opening(line).is_some() {
                depth += 1;
            }
        }

        body.push((*line).to_string());
    }

    let consumed = body.len();
    (body, false, consumed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_all(input: &str) -> (Vec<Span<'_>>, ParseDiagnostics) {
        let mut diagnostics = ParseDiagnostics::new();
        let spans = scan(input, 1, &mut diagnostics);
        (spans, diagnostics)
    }

    fn component<'a>(span: &'a Span<'_>) -> &'a ComponentSpan {
        match span {
            Span::Component(component) => component,
            other => panic!("expected component, got {:?}", other),
        }
    }

    #[test]
    fn parse_simple_opener() {
        let opening = parse_opening(":::tip").unwrap();
        assert_eq!(opening.kind, ComponentKind::Callout(CalloutKind::Tip));
        assert_eq!(opening.attrs, Attributes::new());
        assert!(opening.inline_title.is_none());
    }

    #[test]
    fn parse_opener_with_attrs_and_title() {
        let opening = parse_opening(r#"  :::command{title="build" usage="phosphor build"} extra"#)
            .unwrap();
        assert_eq!(opening.kind, ComponentKind::Command);
        assert_eq!(opening.attrs.get("usage"), Some("phosphor build"));
        assert_eq!(opening.inline_title.as_deref(), Some("extra"));
    }

    #[test]
    fn parse_hyphenated_and_unknown_names() {
        assert_eq!(
            parse_opening(":::decision-grid").unwrap().kind,
            ComponentKind::DecisionGrid
        );
        assert_eq!(
            parse_opening(":::tabs2").unwrap().kind,
            ComponentKind::Unknown("tabs2".to_string())
        );
        assert!(parse_opening(":::").is_none());
        assert!(parse_opening(":::Tip").is_none());
        assert!(parse_opening("::card{}").is_none());
    }

    #[test]
    fn splits_plain_and_component_spans() {
        let (spans, diagnostics) = scan_all("Intro\n:::tip Heads up\nBody\n:::\nOutro");
        assert!(!diagnostics.has_warnings());
        assert_eq!(spans.len(), 3);
        assert_eq!(
            spans[0],
            Span::Plain {
                lines: vec!["Intro"],
                line: 1
            }
        );
        let tip = component(&spans[1]);
        assert_eq!(tip.line, 2);
        assert_eq!(tip.body, vec!["Body"]);
        assert!(tip.closed);
        assert_eq!(
            spans[2],
            Span::Plain {
                lines: vec!["Outro"],
                line: 5
            }
        );
    }

    #[test]
    fn nested_openers_stay_in_outer_body() {
        let input = ":::accordion{title=\"More\"}\n:::tip\nInner\n:::\nAfter\n:::\nTail";
        let (spans, _) = scan_all(input);
        let outer = component(&spans[0]);
        assert_eq!(outer.opening.kind, ComponentKind::Accordion);
        assert_eq!(outer.body, vec![":::tip", "Inner", ":::", "After"]);
        assert!(matches!(&spans[1], Span::Plain { lines, .. } if lines == &vec!["Tail"]));
    }

    #[test]
    fn delimiters_inside_fence_are_plain_text() {
        let input = "````md\n```\n:::tip\n:::\n````\n:::info\nx\n:::";
        let (spans, diagnostics) = scan_all(input);
        assert!(!diagnostics.has_warnings());
        assert_eq!(spans.len(), 2);
        assert!(matches!(&spans[0], Span::Plain { lines, .. } if lines.len() == 5));
        assert_eq!(
            component(&spans[1]).opening.kind,
            ComponentKind::Callout(CalloutKind::Info)
        );
    }

    #[test]
    fn fence_inside_component_hides_closer() {
        let input = ":::tip\n```\n:::\n```\n:::";
        let (spans, diagnostics) = scan_all(input);
        assert!(!diagnostics.has_warnings());
        let tip = component(&spans[0]);
        assert_eq!(tip.body, vec!["```", ":::", "```"]);
        assert!(tip.closed);
    }

    #[test]
    fn unclosed_block_keeps_rest_of_input() {
        let (spans, diagnostics) = scan_all("Lead\n\n:::tip\nStill here\nand here");
        let tip = component(&spans[1]);
        assert!(!tip.closed);
        assert_eq!(tip.body, vec!["Still here", "and here"]);
        assert_eq!(diagnostics.count(), 1);
        match &diagnostics.warnings[0] {
            ParseWarning::UnclosedComponent { location, name } => {
                assert_eq!(name, "tip");
                assert_eq!(location.line, 3);
            }
            other => panic!("unexpected warning {:?}", other),
        }
    }

    #[test]
    fn unclosed_fence_is_reported() {
        let (spans, diagnostics) = scan_all("text\n~~~\n:::tip\n");
        assert_eq!(spans.len(), 1);
        assert!(matches!(
            &diagnostics.warnings[0],
            ParseWarning::UnclosedCodeFence { marker: '~', location, .. } if location.line == 2
        ));
    }

    #[test]
    fn first_line_offsets_positions() {
        let mut diagnostics = ParseDiagnostics::new();
        let spans = scan("a\n:::warn", 10, &mut diagnostics);
        assert_eq!(component(&spans[1]).line, 11);
        assert_eq!(diagnostics.warnings[0].location().line, 11);
    }

    #[test]
    fn stray_closer_is_plain() {
        let (spans, diagnostics) = scan_all("text\n:::\nmore");
        assert_eq!(spans.len(), 1);
        assert_eq!(diagnostics.count(), 1);
        assert_eq!(diagnostics.warnings[0].location().line, 2);
        assert!(matches!(
            &diagnostics.warnings[0],
            ParseWarning::SuspiciousMarkup { message, .. } if message.contains("Stray")
        ));
    }
}
