//! Inline markdown processing.
//!
//! Rules run left to right over one text run, each as a single
//! non-overlapping pass:
//!
//! 1. code spans (double backtick, then single) are swapped for placeholders
//! 2. images `![alt](src)`
//! 3. class-annotated links `[label](url){.class}`
//! 4. plain links `[label](url)`
//! 5. bold `**text**`, then italic `*text*`
//! 6. placeholders are restored with their pre-escaped HTML
//!
//! Text outside code spans is emitted as authored, so inline HTML written by
//! the page author passes through.

use std::fmt::Write as _;

use crate::escape::{escape_html, sanitize_url};

/// Delimits code-span placeholders. Stripped from input so placeholders
/// cannot collide with authored text.
const PLACEHOLDER: char = '\u{0}';

/// Renders one text run to HTML.
pub fn render_inline(text: &str, button_class: &str) -> String {
    let text: String = text.chars().filter(|c| *c != PLACEHOLDER).collect();

    let mut code_spans = Vec::new();
    let text = replace_matches(&text, |rest| code_span_at(rest, "``", &mut code_spans));
    let text = replace_matches(&text, |rest| code_span_at(rest, "`", &mut code_spans));

    let text = replace_matches(&text, |rest| {
        let link = bracket_link_at(rest.strip_prefix('!')?, true)?;
        let html = format!(
            r#"<img src="{}" alt="{}">"#,
            sanitize_url(link.url),
            escape_html(link.label)
        );
        Some((1 + link.len, html))
    });

    let text = replace_matches(&text, |rest| {
        let link = bracket_link_at(rest, false)?;
        let (class, class_len) = class_suffix_at(&rest[link.len..])?;
        let html = format!(
            r#"<a href="{}" class="{} {}">{}</a>"#,
            sanitize_url(link.url),
            escape_html(button_class),
            class,
            link.label
        );
        Some((link.len + class_len, html))
    });

    let text = replace_matches(&text, |rest| {
        let link = bracket_link_at(rest, false)?;
        let html = format!(r#"<a href="{}">{}</a>"#, sanitize_url(link.url), link.label);
        Some((link.len, html))
    });

    let text = replace_matches(&text, |rest| {
        let (len, content) = emphasis_at(rest, "**")?;
        Some((len, format!("<strong>{}</strong>", content)))
    });
    let text = replace_matches(&text, |rest| {
        let (len, content) = emphasis_at(rest, "*")?;
        Some((len, format!("<em>{}</em>", content)))
    });

    restore_placeholders(text, &code_spans)
}

/// Renders a hero title: the text is escaped and `**accent**` runs become
/// `<span class="accent">` rather than `<strong>`.
pub fn render_accent_title(text: &str) -> String {
    let escaped = escape_html(text.trim());
    replace_matches(&escaped, |rest| {
        let (len, content) = emphasis_at(rest, "**")?;
        Some((len, format!(r#"<span class="accent">{}</span>"#, content)))
    })
}

/// A parsed `[label](url)` construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BracketLink<'a> {
    pub label: &'a str,
    pub url: &'a str,
    /// Bytes consumed, from `[` through `)`.
    pub len: usize,
}

/// Matches `[label](url)` at the start of `rest`.
///
/// The label stops at the first `]` and the url at the first `)`; the url is
/// never empty, the label only when `allow_empty_label` is set.
pub(crate) fn bracket_link_at(rest: &str, allow_empty_label: bool) -> Option<BracketLink<'_>> {
    let after_open = rest.strip_prefix('[')?;
    let close = after_open.find(']')?;
    if close == 0 && !allow_empty_label {
        return None;
    }
    let label = &after_open[..close];
    let tail = after_open[close + 1..].strip_prefix('(')?;
    let end = tail.find(')')?;
    if end == 0 {
        return None;
    }
    Some(BracketLink {
        label,
        url: &tail[..end],
        len: close + end + 4,
    })
}

/// Matches `{.class}` at the start of `rest`, returning the class and bytes consumed.
pub(crate) fn class_suffix_at(rest: &str) -> Option<(&str, usize)> {
    let after = rest.strip_prefix("{.")?;
    let name_len: usize = after
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .map(char::len_utf8)
        .sum();
    if name_len == 0 || !after[name_len..].starts_with('}') {
        return None;
    }
    Some((&after[..name_len], name_len + 3))
}

/// Matches `marker content marker` at the start of `rest` with the shortest
/// non-empty single-line content.
fn emphasis_at<'a>(rest: &'a str, marker: &str) -> Option<(usize, &'a str)> {
    let body = rest.strip_prefix(marker)?;
    let first = body.chars().next()?;
    if first == '\n' {
        return None;
    }
    let search_from = first.len_utf8();
    let close = search_from + body[search_from..].find(marker)?;
    let content = &body[..close];
    if content.contains('\n') {
        return None;
    }
    Some((marker.len() * 2 + close, content))
}

/// Matches a code span delimited by `delim` and stores its escaped HTML.
fn code_span_at(rest: &str, delim: &str, spans: &mut Vec<String>) -> Option<(usize, String)> {
    let body = rest.strip_prefix(delim)?;
    let (content, consumed) = if delim.len() > 1 {
        let (len, content) = emphasis_at(rest, delim)?;
        (content, len)
    } else {
        let close = body.find(delim)?;
        if close == 0 {
            return None;
        }
        (&body[..close], close + 2)
    };

    let index = spans.len();
    spans.push(format!("<code>{}</code>", escape_html(content.trim())));
    let mut placeholder = String::new();
    write!(placeholder, "{PLACEHOLDER}{index}{PLACEHOLDER}").ok();
    Some((consumed, placeholder))
}

fn restore_placeholders(mut text: String, spans: &[String]) -> String {
    for (index, html) in spans.iter().enumerate() {
        let placeholder = format!("{PLACEHOLDER}{index}{PLACEHOLDER}");
        text = text.replace(&placeholder, html);
    }
    text
}

/// Applies `rule` at every position, left to right, without overlap.
///
/// `rule` sees the remaining text and returns the number of bytes it consumed
/// with the replacement; unmatched characters are copied through.
fn replace_matches(
    text: &str,
    mut rule: impl FnMut(&str) -> Option<(usize, String)>,
) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        if let Some((consumed, replacement)) = rule(rest).filter(|(consumed, _)| *consumed > 0) {
            out.push_str(&replacement);
            pos += consumed;
        } else if let Some(ch) = rest.chars().next() {
            out.push(ch);
            pos += ch.len_utf8();
        } else {
            break;
        }
    }
    out
}
