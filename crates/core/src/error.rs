use serde::Serialize;
use thiserror::Error;

/// Source location information for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    /// Optional file path
    pub file: Option<String>,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            file: None,
            line,
            column,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:{}:{}", file, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Errors surfaced by the engine's fallible entry points.
///
/// Parsing itself never fails; only loading options from external
/// configuration can.
#[derive(Debug, Error)]
pub enum PhosphorError {
    /// Parse options could not be deserialized.
    #[error("Invalid parse options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

/// Non-fatal warnings that don't prevent rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ParseWarning {
    /// Component block (`:::name`) opened but never closed
    UnclosedComponent {
        /// Line of the opening delimiter
        location: SourceLocation,
        /// Component type name as written on the opener
        name: String,
    },
    /// Code fence opened but never closed
    UnclosedCodeFence {
        /// Source location where the fence started
        location: SourceLocation,
        /// Fence marker character (backtick or tilde)
        marker: char,
        /// Opening fence line, for the message
        context: String,
    },
    /// Markup that rendered in a degraded form
    SuspiciousMarkup {
        /// Source location where the suspicious markup was found
        location: SourceLocation,
        /// Warning message
        message: String,
    },
}

impl ParseWarning {
    /// Get the location of this warning
    pub fn location(&self) -> &SourceLocation {
        match self {
            ParseWarning::UnclosedComponent { location, .. } => location,
            ParseWarning::UnclosedCodeFence { location, .. } => location,
            ParseWarning::SuspiciousMarkup { location, .. } => location,
        }
    }

    fn location_mut(&mut self) -> &mut SourceLocation {
        match self {
            ParseWarning::UnclosedComponent { location, .. } => location,
            ParseWarning::UnclosedCodeFence { location, .. } => location,
            ParseWarning::SuspiciousMarkup { location, .. } => location,
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnclosedComponent { location, name } => {
                write!(
                    f,
                    "Unclosed :::{} block (started near line {}); treating rest of input as block content",
                    name, location.line
                )
            }
            ParseWarning::UnclosedCodeFence {
                location,
                marker,
                context,
            } => {
                write!(
                    f,
                    "Unclosed code fence ({}): {}, near '{}'",
                    marker, location, context
                )
            }
            ParseWarning::SuspiciousMarkup { location, message } => {
                write!(f, "{}: {}", location, message)
            }
        }
    }
}

/// Collection of parse diagnostics.
///
/// Diagnostics never stop a parse; the caller decides whether they affect
/// build success.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<ParseWarning>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the diagnostics collection
    pub fn add_warning(&mut self, warning: ParseWarning) {
        self.warnings.push(warning);
    }

    /// Add a warning with location
    pub fn add_warning_at(&mut self, message: impl Into<String>, line: usize, column: usize) {
        self.warnings.push(ParseWarning::SuspiciousMarkup {
            location: SourceLocation::new(line, column),
            message: message.into(),
        });
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Attributes every warning to `file`.
    pub fn set_file(&mut self, file: &str) {
        for warning in &mut self.warnings {
            warning.location_mut().file = Some(file.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclosed_component_message_names_block() {
        let warning = ParseWarning::UnclosedComponent {
            location: SourceLocation::new(4, 1),
            name: "tip".to_string(),
        };
        let message = warning.to_string();
        assert!(message.contains(":::tip"));
        assert!(message.contains("line 4"));
        assert_eq!(warning.location().line, 4);
    }

    #[test]
    fn location_display_with_file() {
        let location = SourceLocation {
            file: Some("pages/index.md".to_string()),
            ..SourceLocation::new(3, 7)
        };
        assert_eq!(location.to_string(), "pages/index.md:3:7");
        assert_eq!(SourceLocation::new(3, 7).to_string(), "3:7");
    }

    #[test]
    fn diagnostics_counts() {
        let mut diagnostics = ParseDiagnostics::new();
        assert!(!diagnostics.has_warnings());
        diagnostics.add_warning_at("odd table", 2, 1);
        diagnostics.add_warning(ParseWarning::UnclosedComponent {
            location: SourceLocation::new(5, 1),
            name: "hero".to_string(),
        });
        assert!(diagnostics.has_warnings());
        assert_eq!(diagnostics.count(), 2);
        assert_eq!(diagnostics.warnings[0].location().line, 2);
        assert_eq!(diagnostics.warnings[0].to_string(), "2:1: odd table");

        diagnostics.set_file("guide.md");
        assert_eq!(diagnostics.warnings[0].to_string(), "guide.md:2:1: odd table");
        assert_eq!(
            diagnostics.warnings[1].location(),
            &SourceLocation {
                file: Some("guide.md".to_string()),
                ..SourceLocation::new(5, 1)
            }
        );
    }
}
