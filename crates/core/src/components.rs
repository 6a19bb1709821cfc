//! Structural parsers for `:::` component bodies.
//!
//! Each parser receives a scanned [`ComponentSpan`] and produces a typed
//! [`Block`]. Callout and accordion bodies are parsed recursively through the
//! session, so components nest inside them.

use crate::ast::{
    Accordion, Block, Callout, CalloutKind, Card, CardGrid, CommandBlock, Component,
    DecisionGrid, Flag, Hero, HeroButton, Passthrough, Pipeline, PipelineStage,
};
use crate::attrs::Attributes;
use crate::blocks::{is_table_separator, split_row};
use crate::inline::{bracket_link_at, class_suffix_at};
use crate::scanner::{ComponentKind, ComponentSpan};
use crate::session::ParseSession;

/// Builds the block for one component span.
pub(crate) fn build(span: &ComponentSpan, session: &mut ParseSession<'_>) -> Block {
    let attrs = &span.opening.attrs;
    match &span.opening.kind {
        ComponentKind::Callout(kind) => {
            Block::Component(Component::Callout(callout(span, *kind, session)))
        }
        ComponentKind::Cards => Block::Component(Component::CardGrid(cards(&span.body))),
        ComponentKind::DecisionGrid => decision_grid(&span.body),
        ComponentKind::Command => Block::Component(Component::Command(command(&span.body, attrs))),
        ComponentKind::Accordion => {
            Block::Component(Component::Accordion(accordion(span, session)))
        }
        ComponentKind::Pipeline => Block::Component(Component::Pipeline(pipeline(&span.body))),
        ComponentKind::Hero => Block::Component(Component::Hero(hero(&span.body, attrs, session))),
        ComponentKind::Unknown(name) => {
            log::debug!(
                "Passing through unknown component :::{} at line {}",
                name,
                span.line
            );
            Block::Component(Component::Passthrough(Passthrough {
                name: name.clone(),
                opener: span.opener_line.clone(),
                body: span.body.clone(),
                closed: span.closed,
            }))
        }
    }
}

/// First non-blank line is the title (unless the opener carried one); the
/// rest is parsed as blocks.
fn callout(span: &ComponentSpan, kind: CalloutKind, session: &mut ParseSession<'_>) -> Callout {
    let (title, body_start) = match &span.opening.inline_title {
        Some(title) => (title.clone(), 0),
        None => match span.body.iter().position(|line| !line.trim().is_empty()) {
            Some(index) => (span.body[index].trim().to_string(), index + 1),
            None => (kind.default_title().to_string(), span.body.len()),
        },
    };

    let body_lines = &span.body[body_start..];
    let body = if body_lines.iter().all(|line| line.trim().is_empty()) {
        Vec::new()
    } else {
        session.parse_fragment(&body_lines.join("\n"), span.body_line() + body_start)
    };

    Callout { kind, title, body }
}

fn accordion(span: &ComponentSpan, session: &mut ParseSession<'_>) -> Accordion {
    let title = span
        .opening
        .attrs
        .get("title")
        .map(str::to_string)
        .or_else(|| span.opening.inline_title.clone())
        .unwrap_or_else(|| "Details".to_string());
    let body = session.parse_fragment(&span.body_text(), span.body_line());
    Accordion { title, body }
}

/// One `::marker{...}` child with the lines that follow it.
#[derive(Debug)]
struct ChildEntry {
    attrs: Attributes,
    body: Vec<String>,
}

impl ChildEntry {
    /// Body text with surrounding whitespace and trailing colons removed.
    fn text(&self) -> String {
        self.body
            .join("\n")
            .trim()
            .trim_end_matches(':')
            .trim()
            .to_string()
    }
}

/// Matches a `::name` or `::name{attrs}` marker line, returning the
/// attributes and any text after the marker.
fn child_marker<'a>(line: &'a str, name: &str) -> Option<(Attributes, &'a str)> {
    let rest = line.trim().strip_prefix("::")?.strip_prefix(name)?;
    if rest.is_empty() {
        return Some((Attributes::new(), ""));
    }
    if rest.starts_with('{') {
        let close = rest.find('}')?;
        return Some((Attributes::parse(&rest[..=close]), rest[close + 1..].trim()));
    }
    if rest.starts_with(char::is_whitespace) {
        return Some((Attributes::new(), rest.trim()));
    }
    None
}

/// Splits a body into `::name` entries. Text before the first marker is
/// ignored.
fn split_children(lines: &[String], name: &str) -> Vec<ChildEntry> {
    let mut entries: Vec<ChildEntry> = Vec::new();
    for line in lines {
        if let Some((attrs, trailing)) = child_marker(line, name) {
            let mut body = Vec::new();
            if !trailing.is_empty() {
                body.push(trailing.to_string());
            }
            entries.push(ChildEntry { attrs, body });
        } else if let Some(entry) = entries.last_mut() {
            entry.body.push(line.clone());
        }
    }
    entries
}

fn cards(lines: &[String]) -> CardGrid {
    let cards = split_children(lines, "card")
        .into_iter()
        .map(|entry| Card {
            icon: entry.attrs.get_or("icon", "star").to_string(),
            color: entry.attrs.get_or("color", "teal").to_string(),
            title: entry.attrs.get_or("title", "").to_string(),
            body: entry.text(),
        })
        .collect();
    CardGrid { cards }
}

fn command(lines: &[String], attrs: &Attributes) -> CommandBlock {
    let title = attrs.get_or("title", "command").to_string();
    let usage = attrs.get("usage").map_or_else(|| title.clone(), str::to_string);
    let flags = split_children(lines, "flag")
        .into_iter()
        .map(|entry| Flag {
            name: entry.attrs.get_or("name", "").to_string(),
            short: entry
                .attrs
                .get("short")
                .filter(|short| !short.is_empty())
                .map(str::to_string),
            description: entry.text(),
        })
        .collect();
    CommandBlock {
        title,
        usage,
        flags,
    }
}

/// Fewer than two non-blank lines fall back to a paragraph.
fn decision_grid(lines: &[String]) -> Block {
    let rows: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    let Some((header, data)) = rows.split_first().filter(|_| rows.len() >= 2) else {
        log::debug!("Decision grid with fewer than two lines rendered as a paragraph");
        return Block::Paragraph {
            text: rows.join(" "),
        };
    };

    Block::Component(Component::DecisionGrid(DecisionGrid {
        header: split_row(header),
        rows: data
            .iter()
            .filter(|line| !is_table_separator(line))
            .map(|line| split_row(line))
            .collect(),
    }))
}

fn pipeline(lines: &[String]) -> Pipeline {
    let text = lines.join("\n");
    let stages = text
        .split("->")
        .map(str::trim)
        .filter(|stage| !stage.is_empty())
        .enumerate()
        .map(|(index, label)| PipelineStage::new(index, label))
        .collect();
    Pipeline { stages }
}

/// `# ` lines set the title (last one wins), `[label](url){.class}` lines
/// add buttons, and any other non-blank line becomes a description
/// paragraph.
fn hero(lines: &[String], attrs: &Attributes, session: &mut ParseSession<'_>) -> Hero {
    let mut title = None;
    let mut description = Vec::new();
    let mut buttons = Vec::new();

    for line in lines.iter().map(|line| line.trim()) {
        if line.is_empty() {
            continue;
        }
        if let Some(text) = line.strip_prefix("# ") {
            title = Some(text.to_string());
            continue;
        }
        let (found, trailing) = hero_buttons(line);
        buttons.extend(found);
        if !trailing.is_empty() {
            description.push(Block::Paragraph {
                text: trailing.to_string(),
            });
        }
    }

    Hero {
        id: session.anchor_id("top"),
        badge: attrs
            .get("badge")
            .filter(|badge| !badge.is_empty())
            .map(str::to_string),
        title,
        description,
        buttons,
    }
}

/// Reads whitespace-separated `[label](url){.class}` buttons from the start
/// of a line. Text after the last button is ignored.
/// Reads leading `[label](url){.class}` buttons, returning them and the
/// text that follows the last one.
fn hero_buttons(line: &str) -> (Vec<HeroButton>, &str) {
    let mut buttons = Vec::new();
    let mut rest = line;
    while let Some(link) = bracket_link_at(rest, false) {
        let Some((class, class_len)) = class_suffix_at(&rest[link.len..]) else {
            break;
        };
        buttons.push(HeroButton {
            label: link.label.to_string(),
            url: link.url.to_string(),
            class: class.to_string(),
        });
        rest = rest[link.len + class_len..].trim_start();
    }
    (buttons, rest)
}
