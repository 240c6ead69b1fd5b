//! Block types and conversion to the content tree model.

use hub_renderer::{Block, BlockKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::rich_text::{WireRichText, plain_text, to_spans};

/// Block as returned by the children listing endpoint.
///
/// The payload is keyed by the type tag: `{"type": "quote", "quote": {...}}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    /// Remaining fields, including the payload.
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Response of a block children listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockChildrenResponse {
    #[serde(default)]
    pub results: Vec<WireBlock>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Deserialize)]
struct TextPayload {
    #[serde(default)]
    rich_text: Vec<WireRichText>,
}

#[derive(Deserialize)]
struct CalloutPayload {
    #[serde(default)]
    rich_text: Vec<WireRichText>,
    #[serde(default)]
    icon: Option<Icon>,
}

#[derive(Deserialize)]
struct Icon {
    #[serde(default)]
    emoji: Option<String>,
}

#[derive(Deserialize)]
struct CodePayload {
    #[serde(default)]
    rich_text: Vec<WireRichText>,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Deserialize)]
struct ToDoPayload {
    #[serde(default)]
    rich_text: Vec<WireRichText>,
    #[serde(default)]
    checked: bool,
}

#[derive(Deserialize)]
struct TablePayload {
    #[serde(default)]
    has_column_header: bool,
    #[serde(default)]
    has_row_header: bool,
}

#[derive(Deserialize)]
struct TableRowPayload {
    #[serde(default)]
    cells: Vec<Vec<WireRichText>>,
}

/// Image or file payload: hosted (`file`) or linked (`external`).
#[derive(Deserialize)]
struct FilePayload {
    #[serde(default)]
    file: Option<FileUrl>,
    #[serde(default)]
    external: Option<FileUrl>,
    #[serde(default)]
    caption: Vec<WireRichText>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct FileUrl {
    #[serde(default)]
    url: String,
}

impl FilePayload {
    fn url(&self) -> String {
        self.file
            .as_ref()
            .or(self.external.as_ref())
            .map(|f| f.url.clone())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct EquationPayload {
    #[serde(default)]
    expression: String,
}

impl WireBlock {
    /// Convert to a content tree node without children.
    ///
    /// Unknown type tags and malformed payloads become
    /// [`BlockKind::Unsupported`] carrying the source tag.
    #[must_use]
    pub fn to_block(&self) -> Block {
        let kind = self.convert_kind().unwrap_or_else(|| {
            if is_known(&self.kind) {
                tracing::warn!(block_id = %self.id, kind = %self.kind, "malformed block payload");
            }
            BlockKind::Unsupported {
                kind: self.kind.clone(),
            }
        });
        Block::new(kind).with_id(self.id.clone())
    }

    fn payload<T: DeserializeOwned>(&self) -> Option<T> {
        let value = self.rest.get(&self.kind)?;
        T::deserialize(value).ok()
    }

    fn convert_kind(&self) -> Option<BlockKind> {
        let text = |p: TextPayload| to_spans(&p.rich_text);
        let kind = match self.kind.as_str() {
            "paragraph" => BlockKind::Paragraph {
                text: text(self.payload()?),
            },
            "heading_1" | "heading_2" | "heading_3" => BlockKind::Heading {
                level: match self.kind.as_str() {
                    "heading_1" => 1,
                    "heading_2" => 2,
                    _ => 3,
                },
                text: text(self.payload()?),
            },
            "bulleted_list_item" => BlockKind::BulletedItem {
                text: text(self.payload()?),
            },
            "numbered_list_item" => BlockKind::NumberedItem {
                text: text(self.payload()?),
            },
            "quote" => BlockKind::Quote {
                text: text(self.payload()?),
            },
            "toggle" => BlockKind::Toggle {
                text: text(self.payload()?),
            },
            "callout" => {
                let p: CalloutPayload = self.payload()?;
                BlockKind::Callout {
                    icon: p.icon.and_then(|i| i.emoji),
                    text: to_spans(&p.rich_text),
                }
            }
            "code" => {
                let p: CodePayload = self.payload()?;
                BlockKind::Code {
                    language: p.language.filter(|l| !l.is_empty()),
                    text: to_spans(&p.rich_text),
                }
            }
            "to_do" => {
                let p: ToDoPayload = self.payload()?;
                BlockKind::ToDo {
                    checked: p.checked,
                    text: to_spans(&p.rich_text),
                }
            }
            "table" => {
                let p: TablePayload = self.payload()?;
                BlockKind::Table {
                    has_column_header: p.has_column_header,
                    has_row_header: p.has_row_header,
                }
            }
            "table_row" => {
                let p: TableRowPayload = self.payload()?;
                BlockKind::TableRow {
                    cells: p.cells.iter().map(|cell| to_spans(cell)).collect(),
                }
            }
            "image" => {
                let p: FilePayload = self.payload()?;
                BlockKind::Image {
                    url: p.url(),
                    caption: to_spans(&p.caption),
                }
            }
            "file" | "pdf" => {
                let p: FilePayload = self.payload()?;
                let url = p.url();
                let name = p
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .or_else(|| Some(plain_text(&p.caption)).filter(|c| !c.is_empty()))
                    .unwrap_or_else(|| "Download file".to_owned());
                BlockKind::File { url, name }
            }
            "equation" => {
                let p: EquationPayload = self.payload()?;
                BlockKind::Equation {
                    expression: p.expression,
                }
            }
            "divider" => BlockKind::Divider,
            _ => return None,
        };
        Some(kind)
    }
}

fn is_known(kind: &str) -> bool {
    matches!(
        kind,
        "paragraph"
            | "heading_1"
            | "heading_2"
            | "heading_3"
            | "bulleted_list_item"
            | "numbered_list_item"
            | "quote"
            | "toggle"
            | "callout"
            | "code"
            | "to_do"
            | "table"
            | "table_row"
            | "image"
            | "file"
            | "pdf"
            | "equation"
            | "divider"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_renderer::RichText;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn convert(value: serde_json::Value) -> BlockKind {
        let wire: WireBlock = serde_json::from_value(value).unwrap();
        wire.to_block().kind
    }

    #[test]
    fn test_paragraph() {
        let kind = convert(json!({
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": {"rich_text": [{"type": "text", "plain_text": "Hello"}], "color": "default"}
        }));
        assert_eq!(
            kind,
            BlockKind::Paragraph {
                text: vec![RichText::plain("Hello")]
            }
        );
    }

    #[test]
    fn test_heading_level_from_tag() {
        let kind = convert(json!({
            "id": "b1",
            "type": "heading_2",
            "heading_2": {"rich_text": [{"plain_text": "Scope"}]}
        }));
        assert!(matches!(kind, BlockKind::Heading { level: 2, .. }));
    }

    #[test]
    fn test_callout_emoji_icon() {
        let kind = convert(json!({
            "id": "b1",
            "type": "callout",
            "callout": {"rich_text": [], "icon": {"type": "emoji", "emoji": "⚠️"}}
        }));
        assert_eq!(
            kind,
            BlockKind::Callout {
                icon: Some("⚠️".to_owned()),
                text: vec![]
            }
        );
    }

    #[test]
    fn test_image_external_url_and_caption() {
        let kind = convert(json!({
            "id": "b1",
            "type": "image",
            "image": {
                "type": "external",
                "external": {"url": "https://img.example.com/a.png"},
                "caption": [{"plain_text": "Figure 1"}]
            }
        }));
        assert_eq!(
            kind,
            BlockKind::Image {
                url: "https://img.example.com/a.png".to_owned(),
                caption: vec![RichText::plain("Figure 1")],
            }
        );
    }

    #[test]
    fn test_file_name_fallback() {
        let kind = convert(json!({
            "id": "b1",
            "type": "file",
            "file": {"type": "file", "file": {"url": "https://files.example.com/x.pdf"}, "caption": []}
        }));
        assert_eq!(
            kind,
            BlockKind::File {
                url: "https://files.example.com/x.pdf".to_owned(),
                name: "Download file".to_owned(),
            }
        );
    }

    #[test]
    fn test_table_row_cells() {
        let kind = convert(json!({
            "id": "r1",
            "type": "table_row",
            "table_row": {"cells": [[{"plain_text": "a"}], [{"plain_text": "b"}]]}
        }));
        assert_eq!(
            kind,
            BlockKind::TableRow {
                cells: vec![vec![RichText::plain("a")], vec![RichText::plain("b")]]
            }
        );
    }

    #[test]
    fn test_inline_equation_span() {
        let kind = convert(json!({
            "id": "b1",
            "type": "paragraph",
            "paragraph": {"rich_text": [
                {"type": "equation", "plain_text": "x^2", "equation": {"expression": "x^2"}}
            ]}
        }));
        let BlockKind::Paragraph { text } = kind else {
            panic!("expected paragraph");
        };
        assert!(text[0].equation);
        assert_eq!(text[0].content, "x^2");
    }

    #[test]
    fn test_unknown_type_is_unsupported() {
        let kind = convert(json!({"id": "b1", "type": "synced_block", "synced_block": {}}));
        assert_eq!(
            kind,
            BlockKind::Unsupported {
                kind: "synced_block".to_owned()
            }
        );
    }

    #[test]
    fn test_malformed_payload_is_unsupported() {
        let kind = convert(json!({"id": "b1", "type": "to_do", "to_do": {"checked": "nope"}}));
        assert_eq!(
            kind,
            BlockKind::Unsupported {
                kind: "to_do".to_owned()
            }
        );
    }

    #[test]
    fn test_divider_without_payload() {
        let kind = convert(json!({"id": "b1", "type": "divider"}));
        assert_eq!(kind, BlockKind::Divider);
    }
}
