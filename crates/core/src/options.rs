use serde::{Deserialize, Serialize};

use crate::PhosphorError;

/// Parse and render options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Fence info tag routed to the terminal renderer instead of plain code.
    pub terminal_language: String,
    /// Base class of class-annotated links and hero buttons.
    pub button_class: String,
    /// Whether a trailing `{#custom-id}` on `##`/`###` headings sets the id.
    pub heading_custom_ids: bool,
    /// Whether unclosed blocks and fences are also reported through `log`.
    pub log_diagnostics: bool,
}

impl ParseOptions {
    /// Loads options from a JSON object; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PhosphorError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            terminal_language: "terminal".to_string(),
            button_class: "hero-btn".to_string(),
            heading_custom_ids: true,
            log_diagnostics: true,
        }
    }
}
