use phosphor_core::ast::{Block, Component};
use phosphor_core::{
    ParseOptions, ParseWarning, parse_blocks, parse_document, parse_document_with_options,
    render_toc,
};

fn ids(input: &str) -> Vec<String> {
    parse_document(input)
        .headings
        .into_iter()
        .map(|h| h.id)
        .collect()
}

#[test]
fn repeated_headings_get_suffixed_ids() {
    let output = parse_document("## Overview\ntext\n### Overview\n## Overview");
    let ids: Vec<_> = output.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, vec!["overview", "overview-2", "overview-3"]);
    assert!(output.html.contains(r#"<h3 id="overview-2">Overview</h3>"#));
    assert!(output.html.contains(r#"<div class="section" id="overview-3">"#));
}

#[test]
fn suffix_skips_taken_ids() {
    assert_eq!(
        ids("### Overview 2\n### Overview\n### Overview"),
        vec!["overview-2", "overview", "overview-3"]
    );
    assert_eq!(ids("### ???\n### !!!"), vec!["section", "section-2"]);
}

#[test]
fn custom_heading_ids() {
    let output = parse_document("## Install {#setup}\n### Setup");
    assert_eq!(output.headings[0].text, "Install");
    assert_eq!(output.headings[0].id, "setup");
    assert_eq!(output.headings[1].id, "setup-2");
    assert!(output.html.contains("<h2>Install</h2>"));
}

#[test]
fn code_span_is_inert() {
    let output = parse_document("`<b>*x*</b>`");
    assert_eq!(output.html, "<p><code>&lt;b&gt;*x*&lt;/b&gt;</code></p>\n");
}

#[test]
fn javascript_links_are_neutralized() {
    let output = parse_document("[click](javascript:alert(1))");
    assert!(output.html.contains(r##"<a href="#">click</a>"##));
    assert!(!output.diagnostics.has_warnings());
}

#[test]
fn four_backtick_fence_survives_three_backtick_line() {
    let input = "````\n```\n:::tip\nnot a callout\n:::\n````";
    let output = parse_document(input);
    assert_eq!(
        output.html,
        "<pre><code>```\n:::tip\nnot a callout\n:::</code></pre>\n"
    );
    assert!(!output.diagnostics.has_warnings());
}

#[test]
fn unclosed_tip_degrades_with_one_diagnostic() {
    let output = parse_document("Intro\n\n:::tip\nCareful\nStill inside");
    assert!(!output.html.is_empty());
    assert!(output.html.contains("<div class=\"callout tip\">"));
    assert!(output.html.contains("<p>Still inside</p>"));
    assert_eq!(output.diagnostics.count(), 1);
    let warning = &output.diagnostics.warnings[0];
    assert!(matches!(warning, ParseWarning::UnclosedComponent { name, .. } if name == "tip"));
    assert!(warning.to_string().contains("tip"));
    assert_eq!(warning.location().line, 3);
}

#[test]
fn nested_diagnostics_use_document_lines() {
    let output = parse_document("a\n:::accordion\nbody\n:::warn\nopen");
    let lines: Vec<_> = output
        .diagnostics
        .warnings
        .iter()
        .map(|w| w.location().line)
        .collect();
    assert_eq!(lines, vec![2, 4]);
}

#[test]
fn unclosed_fence_is_reported_and_rendered() {
    let output = parse_document("```rust\nfn main() {}");
    assert!(matches!(
        &output.diagnostics.warnings[..],
        [ParseWarning::UnclosedCodeFence { marker: '`', .. }]
    ));
    assert_eq!(
        output.html,
        "<pre><code class=\"language-rust\">fn main() {}</code></pre>\n"
    );
}

#[test]
fn setup_usage_sections() {
    let document = parse_blocks(
        "## Setup\nInstall the tool.\n## Usage\nRun it.",
        &ParseOptions::default(),
    );
    assert_eq!(document.blocks.len(), 2);
    for (block, expected) in document.blocks.iter().zip(["setup", "usage"]) {
        let Block::Section { id, children, .. } = block else {
            panic!("expected section, got {:?}", block);
        };
        assert_eq!(id, expected);
        assert!(matches!(children.as_slice(), [Block::Paragraph { .. }]));
    }
    let headings: Vec<_> = document
        .headings
        .iter()
        .map(|h| (h.level, h.text.as_str(), h.id.as_str()))
        .collect();
    assert_eq!(headings, vec![(2, "Setup", "setup"), (2, "Usage", "usage")]);
}

#[test]
fn pipeline_scenario() {
    let document = parse_blocks(
        ":::pipeline\nFetch -> Parse -> Render\n:::",
        &ParseOptions::default(),
    );
    let [Block::Component(Component::Pipeline(pipeline))] = document.blocks.as_slice() else {
        panic!("expected a pipeline, got {:?}", document.blocks);
    };
    let stages: Vec<_> = pipeline
        .stages
        .iter()
        .map(|s| format!("{} {}", s.ordinal, s.label))
        .collect();
    assert_eq!(stages, vec!["01 Fetch", "02 Parse", "03 Render"]);
}

#[test]
fn components_nest_inside_sections() {
    let input = "\
## Build
:::command{title=\"build\" usage=\"phosphor build [dir]\"}
::flag{name=\"--out\" short=\"-o\"}
Output directory:
:::
Afterwards:
:::tip
Done
Check `dist/`.
:::
## Next
";
    let output = parse_document(input);
    let build = output
        .html
        .split("<div class=\"section\" id=\"next\">")
        .next()
        .unwrap_or_default();
    assert!(build.contains("<div class=\"cmd-block\">"));
    assert!(build.contains("<td>Output directory</td>"));
    assert!(build.contains("<div class=\"callout-title\">Done</div>"));
    assert!(build.contains("<p>Check <code>dist/</code>.</p>"));
}

#[test]
fn hero_anchor_is_allocated() {
    let output = parse_document(":::hero{badge=\"beta\"}\n# Ship **docs**\n[Start](#top){.primary}\n:::\n## Top");
    assert!(output.html.starts_with("<div class=\"hero\" id=\"top\">"));
    assert!(output.html.contains("<a href=\"#top\" class=\"hero-btn primary\">Start</a>"));
    assert_eq!(output.headings[0].id, "top-2");
}

#[test]
fn unknown_components_pass_through() {
    let output = parse_document(":::tabs\n- one\n:::\n\ntext");
    assert_eq!(output.html, ":::tabs\n- one\n:::\n<p>text</p>\n");
}

#[test]
fn raw_html_is_not_escaped() {
    let output = parse_document("<div class=\"grid\">\n  <span>a & b</span>\n</div>\n\n**after**");
    assert_eq!(
        output.html,
        "<div class=\"grid\">\n  <span>a & b</span>\n</div>\n<p><strong>after</strong></p>\n"
    );
}

#[test]
fn terminal_language_is_configurable() {
    let options = ParseOptions::from_json(r#"{"terminalLanguage": "shell"}"#).unwrap();
    let output = parse_document_with_options("```shell\n$ ls\n```", &options);
    assert!(output.html.contains("<span class=\"cmd\">ls</span>"));
    let output = parse_document_with_options("```terminal\n$ ls\n```", &options);
    assert!(output.html.contains("<code class=\"language-terminal\">$ ls</code>"));
}

#[test]
fn toc_from_headings() {
    let output = parse_document("## One\n### Two");
    let toc = render_toc(&output.headings);
    assert!(toc.contains("<a href=\"#one\">One</a>"));
    assert!(toc.contains("<a href=\"#two\" class=\"toc-h3\">Two</a>"));
}

#[test]
fn output_serializes() {
    let output = parse_document(":::warn\nx");
    let json = serde_json::to_value(&output).unwrap();
    assert_eq!(json["diagnostics"]["warnings"][0]["kind"], "unclosedComponent");
    assert_eq!(json["diagnostics"]["warnings"][0]["name"], "warn");
}

#[test]
fn bare_angle_bracket_survives_in_heading_records() {
    let output = parse_document("## When 1 < 2 holds\n### a<b");
    let headings: Vec<_> = output
        .headings
        .iter()
        .map(|h| (h.text.as_str(), h.id.as_str()))
        .collect();
    assert_eq!(headings, vec![("When 1 < 2 holds", "when-1-2-holds"), ("a<b", "a-b")]);
    assert!(render_toc(&output.headings).contains("<a href=\"#when-1-2-holds\">When 1 &lt; 2 holds</a>"));
}
