//! Block-level markdown processor.
//!
//! Recursive descent over scanned items. Each iteration recognizes one
//! construct and consumes at least one item, so the loop always terminates.

use crate::ast::{Block, Table, TerminalLine};
use crate::code_fence::{FenceState, advance_fence_state, detect_fence};
use crate::components;
use crate::scanner::ComponentSpan;
use crate::session::ParseSession;

/// One unit of scanner output: a plain line or a whole component.
#[derive(Debug, Clone)]
pub(crate) enum Item<'a> {
    /// A plain markdown line and its document line number.
    Line { text: &'a str, line: usize },
    /// A component span, opaque at this level.
    Component(ComponentSpan),
}

impl<'a> Item<'a> {
    fn text(&self) -> Option<&'a str> {
        match self {
            Item::Line { text, .. } => Some(*text),
            Item::Component(_) => None,
        }
    }
}

/// Block-level tags that start a raw HTML block.
const HTML_BLOCK_TAGS: &[&str] = &[
    "div", "details", "summary", "table", "thead", "tbody", "tr", "th", "td", "section", "nav",
    "aside", "header", "footer", "article", "button", "pre", "ul", "ol", "hr", "h1", "h2", "h3",
    "h4", "h5", "h6",
];

/// Builds blocks from `items`, registering headings in document order.
pub(crate) fn process(items: &[Item<'_>], session: &mut ParseSession<'_>) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < items.len() {
        let (line, line_no) = match &items[i] {
            Item::Component(span) => {
                blocks.push(components::build(span, session));
                i += 1;
                continue;
            }
            Item::Line { text, line } => (*text, *line),
        };

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if let Some((marker, info)) = detect_fence(line) {
            let mut body = Vec::new();
            i += 1;
            while let Some(text) = items.get(i).and_then(Item::text) {
                i += 1;
                if marker.is_closed_by(text) {
                    break;
                }
                body.push(text.to_string());
            }
            blocks.push(code_block(body, info, session));
            continue;
        }

        if let Some(title) = line.strip_prefix("## ") {
            let (title, id) = session.register_heading(2, title.trim());
            let end = section_end(items, i + 1);
            let children = process(&items[i + 1..end], session);
            blocks.push(Block::Section {
                id,
                title,
                children,
            });
            i = end;
            continue;
        }

        if let Some(text) = line.strip_prefix("### ") {
            let (text, id) = session.register_heading(3, text.trim());
            blocks.push(Block::Heading {
                level: 3,
                text,
                id: Some(id),
            });
            i += 1;
            continue;
        }

        if let Some(text) = line.strip_prefix("#### ") {
            blocks.push(Block::Heading {
                level: 4,
                text: text.trim().to_string(),
                id: None,
            });
            i += 1;
            continue;
        }

        if is_rule(line) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        if unordered_item(line).is_some() {
            let (items_text, consumed) = collect_list(&items[i..], unordered_item);
            blocks.push(Block::UnorderedList { items: items_text });
            i += consumed;
            continue;
        }

        if ordered_item(line).is_some() {
            let (items_text, consumed) = collect_list(&items[i..], ordered_item);
            blocks.push(Block::OrderedList { items: items_text });
            i += consumed;
            continue;
        }

        if line.contains('|')
            && items
                .get(i + 1)
                .and_then(Item::text)
                .is_some_and(is_table_separator)
        {
            let rows: Vec<&str> = items[i..]
                .iter()
                .map_while(Item::text)
                .take_while(|text| text.contains('|') && detect_fence(text).is_none())
                .collect();
            i += rows.len();
            blocks.push(table(&rows, line_no));
            continue;
        }

        if is_html_block_start(line) {
            let (html, consumed) = collect_html_block(&items[i..]);
            blocks.push(Block::RawHtml { html });
            i += consumed;
            continue;
        }

        let mut lines = vec![line.trim()];
        i += 1;
        while let Some(text) = items.get(i).and_then(Item::text) {
            if interrupts_paragraph(text) {
                break;
            }
            lines.push(text.trim());
            i += 1;
        }
        blocks.push(Block::Paragraph {
            text: lines.join(" "),
        });
    }

    blocks
}

fn code_block(lines: Vec<String>, info: &str, session: &ParseSession<'_>) -> Block {
    let language: String = info
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if !language.is_empty() && language == session.options().terminal_language {
        return Block::Terminal {
            lines: lines.iter().map(|line| TerminalLine::classify(line)).collect(),
        };
    }

    Block::CodeBlock {
        lines,
        language: Some(language).filter(|language| !language.is_empty()),
    }
}

/// Index one past the last item of a section starting at `start`.
///
/// Stops at the next `## ` line outside a code fence. Fence state is tracked
/// here independently of the scanner.
fn section_end(items: &[Item<'_>], start: usize) -> usize {
    let mut fence = FenceState::default();
    for (offset, item) in items[start..].iter().enumerate() {
        let Some(text) = item.text() else {
            continue;
        };
        let outcome = advance_fence_state(text, fence);
        fence = outcome.next_state;
        if !outcome.in_fence && text.starts_with("## ") {
            return start + offset;
        }
    }
    items.len()
}

fn is_rule(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 3 && line.bytes().all(|b| b == b'-')
}

fn unordered_item(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix(['-', '*'])?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

fn ordered_item(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = trimmed[digits..].strip_prefix('.')?;
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

fn collect_list(
    items: &[Item<'_>],
    item_text: fn(&str) -> Option<&str>,
) -> (Vec<String>, usize) {
    let entries: Vec<String> = items
        .iter()
        .map_while(Item::text)
        .map_while(item_text)
        .map(str::to_string)
        .collect();
    let consumed = entries.len();
    (entries, consumed)
}

/// A row made only of `|`, `-`, `:` and whitespace, with at least one `-`.
pub(crate) fn is_table_separator(line: &str) -> bool {
    let line = line.trim();
    line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Splits a pipe row into trimmed cells, ignoring outer pipes.
pub(crate) fn split_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn table(lines: &[&str], first_line: usize) -> Block {
    let [header, _separator, data @ ..] = lines else {
        log::debug!("Table with fewer than two lines rendered as a paragraph");
        return Block::Paragraph {
            text: lines.iter().map(|l| l.trim()).collect::<Vec<_>>().join(" "),
        };
    };

    let header = split_row(header);
    let rows = data
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut cells = split_row(line);
            if cells.len() != header.len() {
                log::debug!(
                    "Resizing table row with {} cells to {} (table at line {})",
                    cells.len(),
                    header.len(),
                    first_line
                );
                cells.resize(header.len(), String::new());
            }
            cells
        })
        .collect();

    Block::Table(Table { header, rows })
}

/// `<tag` or `</tag` from the allow-list at a word boundary, or an
/// `<a class="hero` button.
fn is_html_block_start(line: &str) -> bool {
    let Some(rest) = line.trim().strip_prefix('<') else {
        return false;
    };
    if rest.starts_with("a") && rest[1..].trim_start().starts_with("class=\"hero") {
        return rest[1..].starts_with(char::is_whitespace);
    }
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    HTML_BLOCK_TAGS.iter().any(|tag| {
        rest.strip_prefix(tag).is_some_and(|after| {
            !after.starts_with(|c: char| c.is_alphanumeric() || c == '_')
        })
    })
}

/// How a line continues a raw HTML block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlLine {
    /// Ends the block and is consumed with it.
    Blank,
    /// Starts with `<`.
    Markup,
    /// Ends the block and is left for the next construct.
    Breaker,
    /// Prose inside the block.
    Content,
}

fn classify_html_line(line: &str) -> HtmlLine {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        HtmlLine::Blank
    } else if trimmed.starts_with('<') {
        HtmlLine::Markup
    } else if trimmed.starts_with('#') || trimmed.starts_with(":::") || detect_fence(line).is_some()
    {
        HtmlLine::Breaker
    } else {
        HtmlLine::Content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HtmlBlockState {
    Collecting,
    Done,
}

/// Collects a raw HTML block whose first item is the opening line.
///
/// Returns the HTML and the number of items consumed. A component item ends
/// the block like a breaker line.
fn collect_html_block(items: &[Item<'_>]) -> (String, usize) {
    let mut lines = Vec::new();
    let mut consumed = 0;
    let mut state = HtmlBlockState::Collecting;

    if let Some(first) = items.first().and_then(Item::text) {
        lines.push(first);
        consumed = 1;
    }

    while state == HtmlBlockState::Collecting {
        let Some(text) = items.get(consumed).and_then(Item::text) else {
            break;
        };
        state = match classify_html_line(text) {
            HtmlLine::Blank => {
                consumed += 1;
                HtmlBlockState::Done
            }
            HtmlLine::Breaker => HtmlBlockState::Done,
            HtmlLine::Markup | HtmlLine::Content => {
                lines.push(text);
                consumed += 1;
                HtmlBlockState::Collecting
            }
        };
    }

    (lines.join("\n"), consumed)
}

fn interrupts_paragraph(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with('#')
        || detect_fence(line).is_some()
        || is_html_block_start(line)
        || unordered_item(line).is_some()
        || ordered_item(line).is_some()
        || is_rule(line)
}
