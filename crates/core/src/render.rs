//! HTML rendering of the block tree.
//!
//! A separate final pass: the tree is fully built (and every heading id
//! allocated) before anything here runs.

use std::fmt::Write as _;

use crate::ast::{
    Accordion, Block, Callout, CardGrid, CommandBlock, Component, DecisionGrid, Hero, Passthrough,
    Pipeline, Table, TerminalLine,
};
use crate::escape::{escape_html, sanitize_url};
use crate::inline::{render_accent_title, render_inline};
use crate::options::ParseOptions;

/// Renders blocks to an HTML fragment.
pub fn render_blocks(blocks: &[Block], options: &ParseOptions) -> String {
    let mut renderer = HtmlRenderer::new(options);
    renderer.blocks(blocks);
    renderer.finish()
}

struct HtmlRenderer<'o> {
    options: &'o ParseOptions,
    out: String,
}

impl<'o> HtmlRenderer<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self {
            options,
            out: String::new(),
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn inline(&self, text: &str) -> String {
        render_inline(text, &self.options.button_class)
    }

    fn blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { text } => {
                let html = self.inline(text);
                writeln!(self.out, "<p>{}</p>", html).ok();
            }
            Block::Heading { level, text, id } => {
                let html = self.inline(text);
                let _ = match id {
                    Some(id) => writeln!(
                        self.out,
                        r#"<h{level} id="{}">{}</h{level}>"#,
                        escape_html(id),
                        html
                    ),
                    None => writeln!(self.out, "<h{level}>{}</h{level}>", html),
                };
            }
            Block::Section {
                id,
                title,
                children,
            } => {
                let html = self.inline(title);
                writeln!(self.out, r#"<div class="section" id="{}">"#, escape_html(id)).ok();
                self.out.push_str("  <span class=\"section-anchor\"></span>\n");
                writeln!(self.out, "  <h2>{}</h2>", html).ok();
                self.out.push_str("  <hr class=\"section-rule\">\n");
                self.blocks(children);
                self.out.push_str("</div>\n");
            }
            Block::Rule => self.out.push_str("<hr>\n"),
            Block::UnorderedList { items } => self.list("ul", items),
            Block::OrderedList { items } => self.list("ol", items),
            Block::Table(table) => self.table(table),
            Block::CodeBlock { lines, language } => {
                let code = escape_html(&lines.join("\n")).into_owned();
                let _ = match language {
                    Some(language) => writeln!(
                        self.out,
                        r#"<pre><code class="language-{}">{}</code></pre>"#,
                        escape_html(language),
                        code
                    ),
                    None => writeln!(self.out, "<pre><code>{}</code></pre>", code),
                };
            }
            Block::Terminal { lines } => self.terminal(lines),
            Block::RawHtml { html } => {
                self.out.push_str(html);
                self.out.push('\n');
            }
            Block::Component(component) => self.component(component),
        }
    }

    fn list(&mut self, tag: &str, items: &[String]) {
        writeln!(self.out, "<{tag}>").ok();
        for item in items {
            let html = self.inline(item);
            writeln!(self.out, "  <li>{}</li>", html).ok();
        }
        writeln!(self.out, "</{tag}>").ok();
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<div class=\"table-wrap\">\n<table>\n<thead><tr>");
        for cell in &table.header {
            write!(self.out, "<th>{}</th>", escape_html(cell)).ok();
        }
        self.out.push_str("</tr></thead>\n<tbody>\n");
        for row in &table.rows {
            self.out.push_str("<tr>");
            for cell in row {
                let html = self.inline(cell);
                write!(self.out, "<td>{}</td>", html).ok();
            }
            self.out.push_str("</tr>\n");
        }
        self.out.push_str("</tbody>\n</table>\n</div>\n");
    }

    fn terminal(&mut self, lines: &[TerminalLine]) {
        self.out.push_str(concat!(
            "<div class=\"terminal\">\n",
            "  <div class=\"terminal-bar\">\n",
            "    <span class=\"terminal-dot red\"></span>\n",
            "    <span class=\"terminal-dot yellow\"></span>\n",
            "    <span class=\"terminal-dot green\"></span>\n",
        ));
        writeln!(
            self.out,
            "    <span class=\"terminal-title\">{}</span>",
            escape_html(&self.options.terminal_language)
        )
        .ok();
        self.out.push_str("  </div>\n  <div class=\"terminal-body\">\n");
        for line in lines {
            let _ = match line {
                TerminalLine::Command(cmd) => writeln!(
                    self.out,
                    r#"<div><span class="prompt">$ </span><span class="cmd">{}</span></div>"#,
                    escape_html(cmd)
                ),
                TerminalLine::Comment(text) => writeln!(
                    self.out,
                    r#"<div><span class="comment">{}</span></div>"#,
                    escape_html(text)
                ),
                TerminalLine::Output(text) => writeln!(
                    self.out,
                    r#"<div><span class="output">{}</span></div>"#,
                    escape_html(text)
                ),
            };
        }
        self.out.push_str("  </div>\n</div>\n");
    }

    fn component(&mut self, component: &Component) {
        match component {
            Component::Callout(callout) => self.callout(callout),
            Component::CardGrid(grid) => self.cards(grid),
            Component::DecisionGrid(grid) => self.decision_grid(grid),
            Component::Command(command) => self.command(command),
            Component::Accordion(accordion) => self.accordion(accordion),
            Component::Pipeline(pipeline) => self.pipeline(pipeline),
            Component::Hero(hero) => self.hero(hero),
            Component::Passthrough(passthrough) => self.passthrough(passthrough),
        }
    }

    fn callout(&mut self, callout: &Callout) {
        writeln!(self.out, r#"<div class="callout {}">"#, callout.kind.as_str()).ok();
        writeln!(
            self.out,
            r#"  <div class="callout-title">{}</div>"#,
            escape_html(&callout.title)
        )
        .ok();
        self.out.push_str("  <div class=\"callout-body\">");
        self.blocks(&callout.body);
        self.out.push_str("</div>\n</div>\n");
    }

    fn cards(&mut self, grid: &CardGrid) {
        self.out.push_str("<div class=\"card-grid\">\n");
        for card in &grid.cards {
            let body = self.inline(&card.body);
            self.out.push_str("<div class=\"card\">\n  <div class=\"card-header\">\n");
            writeln!(
                self.out,
                r#"    <div class="card-icon {}"><i data-lucide="{}"></i></div>"#,
                escape_html(&card.color),
                escape_html(&card.icon)
            )
            .ok();
            writeln!(
                self.out,
                r#"    <div class="card-title">{}</div>"#,
                escape_html(&card.title)
            )
            .ok();
            writeln!(self.out, "  </div>\n  <p>{}</p>\n</div>", body).ok();
        }
        self.out.push_str("</div>\n");
    }

    fn decision_grid(&mut self, grid: &DecisionGrid) {
        writeln!(
            self.out,
            r#"<div class="decision-grid" style="grid-template-columns: {};">"#,
            grid.grid_template()
        )
        .ok();
        for cell in &grid.header {
            write!(self.out, r#"<div class="dg-header">{}</div>"#, escape_html(cell)).ok();
        }
        self.out.push('\n');
        for row in &grid.rows {
            self.out.push_str("<div class=\"dg-row\">");
            for cell in row {
                let html = self.inline(cell);
                write!(self.out, r#"<div class="dg-cell">{}</div>"#, html).ok();
            }
            self.out.push_str("</div>\n");
        }
        self.out.push_str("</div>\n");
    }

    fn command(&mut self, command: &CommandBlock) {
        self.out
            .push_str("<div class=\"cmd-block\">\n  <div class=\"cmd-block-header\">\n");
        writeln!(
            self.out,
            r#"    <span class="cmd-block-name">{}</span>"#,
            escape_html(&command.title)
        )
        .ok();
        self.out.push_str("  </div>\n  <div class=\"cmd-block-body\">\n");
        writeln!(
            self.out,
            r#"    <div class="cmd-block-usage">{}</div>"#,
            escape_html(&command.usage)
        )
        .ok();

        if !command.flags.is_empty() {
            self.out.push_str(concat!(
                "    <table class=\"cmd-arg-table\">\n",
                "<thead><tr><th>Flag</th><th>Description</th></tr></thead>\n",
                "<tbody>\n",
            ));
            for flag in &command.flags {
                let description = self.inline(&flag.description);
                let mut label = format!("<code>{}</code>", escape_html(&flag.name));
                if let Some(short) = &flag.short {
                    write!(label, ", <code>{}</code>", escape_html(short)).ok();
                }
                writeln!(
                    self.out,
                    "<tr>\n  <td>{}</td>\n  <td>{}</td>\n</tr>",
                    label, description
                )
                .ok();
            }
            self.out.push_str("</tbody>\n</table>\n");
        }

        self.out.push_str("  </div>\n</div>\n");
    }

    fn accordion(&mut self, accordion: &Accordion) {
        self.out.push_str("<details class=\"trouble-item\">\n");
        writeln!(
            self.out,
            r#"  <summary class="trouble-summary">{}</summary>"#,
            escape_html(&accordion.title)
        )
        .ok();
        self.out.push_str("  <div class=\"trouble-body\">\n");
        self.blocks(&accordion.body);
        self.out.push_str("\n  </div>\n</details>\n");
    }

    fn pipeline(&mut self, pipeline: &Pipeline) {
        self.out.push_str("<div class=\"pipeline-flow\">\n");
        for (index, stage) in pipeline.stages.iter().enumerate() {
            if index > 0 {
                self.out.push_str(
                    "<div class=\"pipeline-arrow\"><i data-lucide=\"arrow-right\"></i></div>\n",
                );
            }
            writeln!(
                self.out,
                "<div class=\"pipeline-stage\">\n  <div class=\"pipeline-node\">\n    <span class=\"stage-num\">{}</span>\n    {}\n  </div>\n</div>",
                stage.ordinal,
                escape_html(&stage.label)
            )
            .ok();
        }
        self.out.push_str("</div>\n");
    }

    fn hero(&mut self, hero: &Hero) {
        writeln!(self.out, r#"<div class="hero" id="{}">"#, escape_html(&hero.id)).ok();
        if let Some(badge) = &hero.badge {
            writeln!(
                self.out,
                r#"<div class="hero-badge">&#9679; {}</div>"#,
                escape_html(badge)
            )
            .ok();
        }
        let title = hero
            .title
            .as_deref()
            .map(render_accent_title)
            .unwrap_or_default();
        writeln!(self.out, "<h1>{}</h1>", title).ok();
        self.blocks(&hero.description);

        self.out.push_str("<div class=\"hero-actions\">\n");
        for button in &hero.buttons {
            writeln!(
                self.out,
                r#"<a href="{}" class="{} {}">{}</a>"#,
                sanitize_url(&button.url),
                escape_html(&self.options.button_class),
                escape_html(&button.class),
                escape_html(&button.label)
            )
            .ok();
        }
        self.out.push_str("</div>\n</div>\n");
    }

    fn passthrough(&mut self, passthrough: &Passthrough) {
        self.out.push_str(&passthrough.opener);
        self.out.push('\n');
        for line in &passthrough.body {
            self.out.push_str(line);
            self.out.push('\n');
        }
        if passthrough.closed {
            self.out.push_str(":::\n");
        }
    }
}
