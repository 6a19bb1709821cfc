//! Block tree produced by the structural pass and consumed by the renderer.
//!
//! Leaf text (paragraphs, list items, cell contents, titles) is kept as
//! authored and run through the inline processor at render time.

use serde::Serialize;

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    /// Lines joined with spaces.
    Paragraph {
        /// Inline source text.
        text: String,
    },
    /// A `###` (with id) or `####` (without id) heading.
    Heading {
        /// Heading level (3 or 4).
        level: u8,
        /// Inline source text.
        text: String,
        /// Allocated id; level 4 headings carry none.
        id: Option<String>,
    },
    /// A `##` heading and everything up to the next `##` at the same scope.
    Section {
        /// Allocated id.
        id: String,
        /// Inline source text of the heading.
        title: String,
        /// Blocks belonging to the section.
        children: Vec<Block>,
    },
    /// Horizontal rule.
    Rule,
    /// `-`/`*` list.
    UnorderedList {
        /// Inline source text per item.
        items: Vec<String>,
    },
    /// `N.` list.
    OrderedList {
        /// Inline source text per item.
        items: Vec<String>,
    },
    /// Pipe table.
    Table(Table),
    /// Fenced code rendered literally.
    CodeBlock {
        /// Raw code lines.
        lines: Vec<String>,
        /// Language tag from the info string.
        language: Option<String>,
    },
    /// Fenced code tagged with the terminal language.
    Terminal {
        /// Classified lines.
        lines: Vec<TerminalLine>,
    },
    /// Block-level HTML emitted unmodified.
    RawHtml {
        /// Original lines joined with newlines.
        html: String,
    },
    /// A `:::` component.
    Component(Component),
}

/// Pipe table; every row has exactly as many cells as the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Header cells (escaped, not inline-processed).
    pub header: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<String>>,
}

/// One line of a terminal block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "camelCase")]
pub enum TerminalLine {
    /// `$ cmd`, stored without the prompt.
    Command(String),
    /// `# note`, stored with the leading `#`.
    Comment(String),
    /// Anything else.
    Output(String),
}

impl TerminalLine {
    /// Classifies a raw terminal line.
    pub fn classify(line: &str) -> Self {
        if let Some(command) = line.strip_prefix("$ ") {
            TerminalLine::Command(command.to_string())
        } else if line.starts_with("# ") {
            TerminalLine::Comment(line.to_string())
        } else {
            TerminalLine::Output(line.to_string())
        }
    }
}

/// Callout flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    /// `:::tip`
    Tip,
    /// `:::info`
    Info,
    /// `:::warn`
    Warn,
}

impl CalloutKind {
    /// CSS modifier and directive name.
    pub fn as_str(self) -> &'static str {
        match self {
            CalloutKind::Tip => "tip",
            CalloutKind::Info => "info",
            CalloutKind::Warn => "warn",
        }
    }

    /// Title used when the callout has no title line.
    pub fn default_title(self) -> &'static str {
        match self {
            CalloutKind::Tip => "Tip",
            CalloutKind::Info => "Info",
            CalloutKind::Warn => "Warn",
        }
    }
}

/// Structured page widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "camelCase")]
pub enum Component {
    /// tip/info/warn box.
    Callout(Callout),
    /// Grid of `::card` entries.
    CardGrid(CardGrid),
    /// Comparison grid from a markdown table.
    DecisionGrid(DecisionGrid),
    /// Command reference with `::flag` rows.
    Command(CommandBlock),
    /// Disclosure widget.
    Accordion(Accordion),
    /// `A -> B -> C` flow.
    Pipeline(Pipeline),
    /// Page hero.
    Hero(Hero),
    /// Unrecognized type, reproduced verbatim.
    Passthrough(Passthrough),
}

/// Callout box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Callout {
    /// Flavor.
    pub kind: CalloutKind,
    /// Title (escaped at render).
    pub title: String,
    /// Recursively parsed body.
    pub body: Vec<Block>,
}

/// Card grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardGrid {
    /// Cards in source order.
    pub cards: Vec<Card>,
}

/// One `::card{...}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Icon name (default `star`).
    pub icon: String,
    /// Color modifier (default `teal`).
    pub color: String,
    /// Title.
    pub title: String,
    /// Inline source text of the body.
    pub body: String,
}

/// Decision grid. Rows are kept exactly as written, without padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionGrid {
    /// Header cells.
    pub header: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<String>>,
}

impl DecisionGrid {
    /// CSS `grid-template-columns` value for the header's column count.
    pub fn grid_template(&self) -> String {
        let mut template = "1fr ".repeat(self.header.len().saturating_sub(1));
        template.push_str("auto");
        template
    }
}

/// Command reference block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandBlock {
    /// Command name.
    pub title: String,
    /// Usage line.
    pub usage: String,
    /// Flags in source order.
    pub flags: Vec<Flag>,
}

/// One `::flag{...}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flag {
    /// Long name, e.g. `--out`.
    pub name: String,
    /// Short name, e.g. `-o`.
    pub short: Option<String>,
    /// Inline source text of the description.
    pub description: String,
}

/// Accordion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accordion {
    /// Summary text.
    pub title: String,
    /// Recursively parsed body.
    pub body: Vec<Block>,
}

/// Pipeline flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pipeline {
    /// Stages in order.
    pub stages: Vec<PipelineStage>,
}

/// One pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineStage {
    /// `01`..`09`, then `10`, `11`, ...
    pub ordinal: String,
    /// Stage label (escaped at render).
    pub label: String,
}

impl PipelineStage {
    /// Creates the stage at zero-based `index`.
    pub fn new(index: usize, label: impl Into<String>) -> Self {
        let number = index + 1;
        let ordinal = if number < 10 {
            format!("0{}", number)
        } else {
            number.to_string()
        };
        Self {
            ordinal,
            label: label.into(),
        }
    }
}

/// Page hero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    /// Anchor id (allocated from `top`).
    pub id: String,
    /// Badge text.
    pub badge: Option<String>,
    /// Title source; `**x**` marks the accent.
    pub title: Option<String>,
    /// Description paragraphs in line order.
    pub description: Vec<Block>,
    /// Action buttons.
    pub buttons: Vec<HeroButton>,
}

/// `[label](url){.class}` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroButton {
    /// Button label.
    pub label: String,
    /// Target url (sanitized at render).
    pub url: String,
    /// Extra class.
    pub class: String,
}

/// Unknown component reproduced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passthrough {
    /// Type name from the opener.
    pub name: String,
    /// The opener line as written.
    pub opener: String,
    /// Body lines.
    pub body: Vec<String>,
    /// Whether a closing `:::` was found.
    pub closed: bool,
}

/// Heading record for navigation and search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingEntry {
    /// 2 or 3.
    pub level: u8,
    /// Display text with markup stripped.
    pub text: String,
    /// Element id.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_ordinals() {
        assert_eq!(PipelineStage::new(0, "Fetch").ordinal, "01");
        assert_eq!(PipelineStage::new(8, "Ninth").ordinal, "09");
        assert_eq!(PipelineStage::new(9, "Tenth").ordinal, "10");
        assert_eq!(PipelineStage::new(11, "Twelfth").ordinal, "12");
    }

    #[test]
    fn terminal_line_classification() {
        assert_eq!(
            TerminalLine::classify("$ cargo build"),
            TerminalLine::Command("cargo build".to_string())
        );
        assert_eq!(
            TerminalLine::classify("# install first"),
            TerminalLine::Comment("# install first".to_string())
        );
        assert_eq!(
            TerminalLine::classify("$cargo"),
            TerminalLine::Output("$cargo".to_string())
        );
    }

    #[test]
    fn grid_template_tracks_columns() {
        let grid = DecisionGrid {
            header: vec!["Need".into(), "Pick".into(), "Why".into()],
            rows: Vec::new(),
        };
        assert_eq!(grid.grid_template(), "1fr 1fr auto");
    }

    #[test]
    fn block_serializes_with_tags() {
        let block = Block::Component(Component::Pipeline(Pipeline {
            stages: vec![PipelineStage::new(0, "Fetch")],
        }));
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "component");
        assert_eq!(json["component"], "pipeline");
        assert_eq!(json["stages"][0]["ordinal"], "01");
    }
}
