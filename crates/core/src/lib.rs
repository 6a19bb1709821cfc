#![deny(missing_docs)]
//! Phosphor core: the extended-markdown to HTML translation engine.
//!
//! A parse runs in two passes. The structural pass scans `:::` component
//! blocks (fence-aware), builds a [`Block`] tree, allocates heading ids and
//! records headings, all inside one [`ParseSession`]. The render pass turns
//! the finished tree into an HTML fragment.
//!
//! ```
//! let output = phosphor_core::parse_document("## Setup\nInstall the tool.");
//! assert!(output.html.contains(r#"<div class="section" id="setup">"#));
//! assert_eq!(output.headings[0].id, "setup");
//! ```

use serde::Serialize;

/// Block tree types.
pub mod ast;
/// `{key="value"}` attribute parsing.
pub mod attrs;
mod blocks;
/// Code fence detection shared by every line-oriented pass.
pub mod code_fence;
mod components;
/// Error and diagnostic types.
pub mod error;
/// HTML escaping and URL sanitization.
pub mod escape;
/// Inline markdown processing.
pub mod inline;
/// Parse options.
pub mod options;
/// HTML rendering of the block tree.
pub mod render;
/// Fence-aware `:::` component scanner.
pub mod scanner;
/// Per-document parse state.
pub mod session;
/// Slug generation and heading-id allocation.
pub mod slug;
/// Table-of-contents fragment.
pub mod toc;

pub use ast::{Block, Component, HeadingEntry};
pub use error::{ParseDiagnostics, ParseWarning, PhosphorError, SourceLocation};
pub use options::ParseOptions;
pub use render::render_blocks;
pub use session::ParseSession;
pub use slug::{HeadingIds, extract_custom_id, slugify};
pub use toc::render_toc;

/// Result of the structural pass.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Top-level blocks.
    pub blocks: Vec<Block>,
    /// Heading records in document order.
    pub headings: Vec<HeadingEntry>,
    /// Recoverable anomalies found while parsing.
    pub diagnostics: ParseDiagnostics,
}

/// Rendered document.
#[derive(Debug, Clone, Serialize)]
pub struct ParseOutput {
    /// HTML fragment.
    pub html: String,
    /// Heading records in document order.
    pub headings: Vec<HeadingEntry>,
    /// Recoverable anomalies found while parsing.
    pub diagnostics: ParseDiagnostics,
}

/// Builds the block tree for one document in a fresh session.
pub fn parse_blocks(input: &str, options: &ParseOptions) -> Document {
    let mut session = ParseSession::new(options);
    let blocks = session.parse_fragment(input, 1);
    let (headings, diagnostics) = session.finish();
    Document {
        blocks,
        headings,
        diagnostics,
    }
}

/// Parses and renders a document with default options.
pub fn parse_document(input: &str) -> ParseOutput {
    parse_document_with_options(input, &ParseOptions::default())
}

/// Parses and renders a document.
///
/// Never fails: anomalies degrade the output and are reported through
/// [`ParseOutput::diagnostics`].
pub fn parse_document_with_options(input: &str, options: &ParseOptions) -> ParseOutput {
    let Document {
        blocks,
        headings,
        diagnostics,
    } = parse_blocks(input, options);
    ParseOutput {
        html: render_blocks(&blocks, options),
        headings,
        diagnostics,
    }
}
