//! "On this page" fragment built from heading records.

use std::fmt::Write as _;

use crate::ast::HeadingEntry;
use crate::escape::escape_html;

/// Renders the table of contents for a page.
///
/// Pages with one heading or none get an empty string.
pub fn render_toc(headings: &[HeadingEntry]) -> String {
    if headings.len() <= 1 {
        return String::new();
    }

    let mut html = String::from("<div class=\"toc-label\">On this page</div>\n");
    for heading in headings {
        let class = if heading.level == 3 {
            " class=\"toc-h3\""
        } else {
            ""
        };
        writeln!(
            html,
            r##"<a href="#{}"{}>{}</a>"##,
            escape_html(&heading.id),
            class,
            escape_html(&heading.text)
        )
        .ok();
    }
    html
}
