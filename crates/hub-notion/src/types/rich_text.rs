//! Rich text objects.

use hub_renderer::{Annotations, RichText};
use serde::{Deserialize, Serialize};

/// Rich text object as returned by the API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WireRichText {
    /// `text`, `mention` or `equation`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Text without formatting.
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Option<WireAnnotations>,
    /// Present when `kind` is `equation`.
    #[serde(default)]
    pub equation: Option<WireEquation>,
}

/// Formatting flags of a rich text object.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct WireAnnotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// Inline equation payload.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WireEquation {
    #[serde(default)]
    pub expression: String,
}

impl WireRichText {
    /// Plain text object, as written by property updates.
    #[must_use]
    pub fn text(content: &str) -> Self {
        Self {
            kind: "text".to_owned(),
            plain_text: content.to_owned(),
            ..Self::default()
        }
    }

    /// Convert to the renderer's span type.
    #[must_use]
    pub fn to_span(&self) -> RichText {
        if let Some(equation) = &self.equation {
            return RichText {
                content: equation.expression.clone(),
                equation: true,
                ..RichText::default()
            };
        }
        let a = self.annotations.unwrap_or_default();
        RichText {
            content: self.plain_text.clone(),
            href: self.href.clone(),
            annotations: Annotations {
                bold: a.bold,
                italic: a.italic,
                strikethrough: a.strikethrough,
                underline: a.underline,
                code: a.code,
            },
            equation: false,
        }
    }
}

/// Join the plain text of every object.
#[must_use]
pub fn plain_text(items: &[WireRichText]) -> String {
    items.iter().map(|t| t.plain_text.as_str()).collect()
}

/// Convert a rich text array to renderer spans.
#[must_use]
pub fn to_spans(items: &[WireRichText]) -> Vec<RichText> {
    items.iter().map(WireRichText::to_span).collect()
}
