//! Per-document parse state.

use crate::ast::{Block, HeadingEntry};
use crate::blocks::{self, Item};
use crate::error::ParseDiagnostics;
use crate::escape::strip_tags;
use crate::inline::render_inline;
use crate::options::ParseOptions;
use crate::scanner::{self, Span};
use crate::slug::{HeadingIds, extract_custom_id};

/// Mutable state scoped to exactly one document parse.
///
/// Owns the heading-id allocator, the heading records, and the diagnostics.
/// [`ParseSession::finish`] consumes the session, so its ids can never leak
/// into another document.
pub struct ParseSession<'o> {
    options: &'o ParseOptions,
    ids: HeadingIds,
    headings: Vec<HeadingEntry>,
    diagnostics: ParseDiagnostics,
}

impl<'o> ParseSession<'o> {
    /// Creates a fresh session.
    pub fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            ids: HeadingIds::new(),
            headings: Vec::new(),
            diagnostics: ParseDiagnostics::new(),
        }
    }

    /// Options in effect for this parse.
    pub fn options(&self) -> &'o ParseOptions {
        self.options
    }

    /// Parses a run of text whose first line is document line `first_line`.
    ///
    /// Used for the whole document and, recursively, for component bodies.
    pub fn parse_fragment(&mut self, input: &str, first_line: usize) -> Vec<Block> {
        let before = self.diagnostics.count();
        let spans = scanner::scan(input, first_line, &mut self.diagnostics);
        if self.options.log_diagnostics {
            for warning in &self.diagnostics.warnings[before..] {
                log::warn!("{}", warning);
            }
        }

        let items = items_from_spans(spans);
        blocks::process(&items, self)
    }

    /// Allocates the id for a `##`/`###` heading and records it.
    ///
    /// Returns the heading text (without any `{#id}` suffix) and its id.
    pub(crate) fn register_heading(&mut self, level: u8, raw: &str) -> (String, String) {
        let (text, custom) = if self.options.heading_custom_ids {
            extract_custom_id(raw)
        } else {
            (raw, None)
        };

        let id = match custom {
            Some(custom) if self.ids.reserve(custom) => custom.to_string(),
            Some(custom) => {
                log::debug!("Custom heading id '{}' already in use", custom);
                self.ids.allocate(custom)
            }
            None => self.ids.next_id(text),
        };

        let display = strip_tags(&render_inline(text, &self.options.button_class));
        self.headings.push(HeadingEntry {
            level,
            text: display,
            id: id.clone(),
        });
        (text.to_string(), id)
    }

    /// Allocates a non-heading anchor id from `base`.
    pub(crate) fn anchor_id(&mut self, base: &str) -> String {
        self.ids.allocate(base)
    }

    /// Ends the session, yielding heading records and diagnostics.
    pub fn finish(self) -> (Vec<HeadingEntry>, ParseDiagnostics) {
        (self.headings, self.diagnostics)
    }
}

fn items_from_spans(spans: Vec<Span<'_>>) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    for span in spans {
        match span {
            Span::Plain { lines, line } => {
                items.extend(
                    lines
                        .into_iter()
                        .enumerate()
                        .map(|(offset, text)| Item::Line {
                            text,
                            line: line + offset,
                        }),
                );
            }
            Span::Component(component) => items.push(Item::Component(component)),
        }
    }
    items
}
