//! Content tree model.
//!
//! A record's content is an ordered sequence of [`Block`]s. Each block carries
//! a kind-specific payload and an ordered list of child blocks.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One node of a content tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Block {
    /// Source identifier of the block.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    /// Kind and payload.
    pub kind: BlockKind,
    /// Nested blocks, in source order.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<Block>,
}

impl Block {
    /// Create a block without children.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: String::new(),
            kind,
            children: Vec::new(),
        }
    }

    /// Set the source identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach child blocks.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    /// Shorthand for a paragraph of plain text.
    #[must_use]
    pub fn paragraph(text: &str) -> Self {
        Self::new(BlockKind::Paragraph {
            text: vec![RichText::plain(text)],
        })
    }

    /// Shorthand for a bulleted list item of plain text.
    #[must_use]
    pub fn bulleted(text: &str) -> Self {
        Self::new(BlockKind::BulletedItem {
            text: vec![RichText::plain(text)],
        })
    }

    /// Shorthand for a numbered list item of plain text.
    #[must_use]
    pub fn numbered(text: &str) -> Self {
        Self::new(BlockKind::NumberedItem {
            text: vec![RichText::plain(text)],
        })
    }
}

/// Block kind with its payload.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum BlockKind {
    Paragraph {
        text: Vec<RichText>,
    },
    /// Heading, level 1 to 3.
    Heading {
        level: u8,
        text: Vec<RichText>,
    },
    BulletedItem {
        text: Vec<RichText>,
    },
    NumberedItem {
        text: Vec<RichText>,
    },
    Quote {
        text: Vec<RichText>,
    },
    Callout {
        icon: Option<String>,
        text: Vec<RichText>,
    },
    Code {
        language: Option<String>,
        text: Vec<RichText>,
    },
    /// Table container; rows are [`BlockKind::TableRow`] children.
    Table {
        has_column_header: bool,
        has_row_header: bool,
    },
    TableRow {
        cells: Vec<Vec<RichText>>,
    },
    Image {
        url: String,
        caption: Vec<RichText>,
    },
    File {
        url: String,
        name: String,
    },
    ToDo {
        checked: bool,
        text: Vec<RichText>,
    },
    /// Display equation (LaTeX source).
    Equation {
        expression: String,
    },
    Divider,
    Toggle {
        text: Vec<RichText>,
    },
    /// Any block kind without a rendering rule.
    Unsupported {
        kind: String,
    },
}

/// List container a block belongs to, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    /// `<ul>`
    Bulleted,
    /// `<ol>`
    Numbered,
}

impl BlockKind {
    /// The list container this kind is grouped into.
    #[must_use]
    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Self::BulletedItem { .. } => Some(ListKind::Bulleted),
            Self::NumberedItem { .. } => Some(ListKind::Numbered),
            _ => None,
        }
    }

    /// Source type tag of this kind.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading { level: 1, .. } => "heading_1",
            Self::Heading { level: 2, .. } => "heading_2",
            Self::Heading { .. } => "heading_3",
            Self::BulletedItem { .. } => "bulleted_list_item",
            Self::NumberedItem { .. } => "numbered_list_item",
            Self::Quote { .. } => "quote",
            Self::Callout { .. } => "callout",
            Self::Code { .. } => "code",
            Self::Table { .. } => "table",
            Self::TableRow { .. } => "table_row",
            Self::Image { .. } => "image",
            Self::File { .. } => "file",
            Self::ToDo { .. } => "to_do",
            Self::Equation { .. } => "equation",
            Self::Divider => "divider",
            Self::Toggle { .. } => "toggle",
            Self::Unsupported { kind } => kind,
        }
    }
}

/// A run of text with uniform formatting.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RichText {
    /// Text content, or LaTeX source for inline equations.
    pub content: String,
    /// Link target.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub href: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub annotations: Annotations,
    /// Whether `content` is an inline equation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub equation: bool,
}

impl RichText {
    /// Unformatted text.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Concatenate the text content of spans without formatting.
    #[must_use]
    pub fn plain_text(spans: &[RichText]) -> String {
        spans.iter().map(|s| s.content.as_str()).collect()
    }
}

/// Inline formatting flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}
