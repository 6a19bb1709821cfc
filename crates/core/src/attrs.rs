//! Attribute parsing for component openers and child markers.
//!
//! Handles the `{key="value" other='x'}` syntax that follows `:::hero`,
//! `::card`, and `::flag`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Attribute name to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an attribute string, with or without surrounding braces.
    ///
    /// Tokens that are not `key="value"` or `key='value'` pairs are ignored.
    /// A repeated key keeps its last value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let inner = raw
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(raw);

        let mut attrs = BTreeMap::new();
        for token in tokenize_attrs(inner) {
            if let Some((key, value)) = split_pair(token) {
                attrs.insert(key.to_string(), value.to_string());
            }
        }
        Self(attrs)
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

/// Splits a `key="value"` token. Keys are word characters and hyphens.
fn split_pair(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return None;
    }
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = value[1..].strip_suffix(quote)?;
    Some((key, value))
}

/// Tokenize attributes respecting quoted values.
/// Splits on whitespace but keeps quoted strings intact.
fn tokenize_attrs(attrs: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;
    let mut in_quotes = false;
    let mut quote_char = '"';

    for (i, c) in attrs.char_indices() {
        match c {
            '"' | '\'' if !in_quotes => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
                in_quotes = true;
                quote_char = c;
            }
            c if c == quote_char && in_quotes => {
                in_quotes = false;
            }
            c if c.is_whitespace() && !in_quotes => {
                if let Some(start) = token_start.take() {
                    tokens.push(&attrs[start..i]);
                }
            }
            _ => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
            }
        }
    }

    if let Some(start) = token_start {
        tokens.push(&attrs[start..]);
    }

    tokens
}
