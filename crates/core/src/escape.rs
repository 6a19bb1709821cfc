//! Escaping helpers shared by the inline processor and the renderer.

use std::borrow::Cow;

/// Escapes text for HTML content and quoted attribute values.
///
/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Escapes a URL for use in an `href`/`src` attribute.
///
/// Any URL whose scheme is `javascript:` is replaced with `#`, ignoring case
/// and any whitespace or control characters browsers would drop while
/// reading the scheme. Other URLs are attribute-escaped but not validated.
pub fn sanitize_url(url: &str) -> Cow<'_, str> {
    let url = url.trim();
    if has_javascript_scheme(url) {
        return Cow::Borrowed("#");
    }
    escape_html(url)
}

fn has_javascript_scheme(url: &str) -> bool {
    const SCHEME: &[u8] = b"javascript:";
    let mut matched = 0;
    for byte in url.bytes() {
        if byte.is_ascii_whitespace() || byte.is_ascii_control() {
            continue;
        }
        if !byte.eq_ignore_ascii_case(&SCHEME[matched]) {
            return false;
        }
        matched += 1;
        if matched == SCHEME.len() {
            return true;
        }
    }
    false
}

/// Removes markup tags and decodes entities, yielding display text.
///
/// A tag is a `<` followed by at least one character and a closing `>`; a
/// `<` with no closing `>` is kept as text.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if close > 0 => rest = &after[close + 1..],
            _ => {
                text.push('<');
                rest = after;
            }
        }
    }
    text.push_str(rest);
    html_escape::decode_html_entities(text.trim()).into_owned()
}
