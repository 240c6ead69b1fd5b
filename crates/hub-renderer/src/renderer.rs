//! Generic content tree renderer with pluggable backend.

use std::marker::PhantomData;

use crate::backend::RenderBackend;
use crate::block::{Block, BlockKind, ListKind, RichText};

/// Default nesting limit for recursive rendering.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Generic content tree renderer with pluggable backend.
///
/// Renders a block sequence in one left-to-right pass. Maximal runs of
/// consecutive list items of the same kind are wrapped in a single list
/// container; any other block, or a list item of the other kind, closes the
/// open run first. Children are rendered by the same pass, recursively.
pub struct BlockRenderer<B: RenderBackend> {
    max_depth: usize,
    _backend: PhantomData<B>,
}

/// List run being accumulated.
struct OpenGroup {
    kind: ListKind,
    items: Vec<String>,
}

impl<B: RenderBackend> BlockRenderer<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            _backend: PhantomData,
        }
    }

    /// Set the nesting depth below which children are no longer rendered.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Render a block sequence to a single fragment.
    ///
    /// Top-level parts are separated by newlines.
    pub fn render(&self, blocks: &[Block]) -> String {
        self.render_sequence(blocks, 0).join("\n")
    }

    fn render_sequence(&self, blocks: &[Block], depth: usize) -> Vec<String> {
        let mut parts = Vec::with_capacity(blocks.len());
        if depth > self.max_depth {
            let mut out = String::new();
            B::depth_exceeded(self.max_depth, &mut out);
            parts.push(out);
            return parts;
        }

        let mut group: Option<OpenGroup> = None;
        for block in blocks {
            match block.kind.list_kind() {
                Some(kind) => {
                    let item = self.render_block(block, depth);
                    match &mut group {
                        Some(open) if open.kind == kind => open.items.push(item),
                        _ => {
                            flush::<B>(&mut group, &mut parts);
                            group = Some(OpenGroup {
                                kind,
                                items: vec![item],
                            });
                        }
                    }
                }
                None => {
                    flush::<B>(&mut group, &mut parts);
                    parts.push(self.render_block(block, depth));
                }
            }
        }
        flush::<B>(&mut group, &mut parts);
        parts
    }

    /// Render one block; its HTML depends only on its payload and children.
    fn render_block(&self, block: &Block, depth: usize) -> String {
        let mut out = String::new();
        let children = || self.render_children(&block.children, depth);
        // Kinds whose rule takes no children get them appended after the block.
        let mut trailing = false;

        match &block.kind {
            BlockKind::Paragraph { text } => B::paragraph(&inline::<B>(text), &children(), &mut out),
            BlockKind::Heading { level, text } => {
                B::heading((*level).clamp(1, 3), &inline::<B>(text), &children(), &mut out);
            }
            BlockKind::BulletedItem { text } | BlockKind::NumberedItem { text } => {
                B::list_item(&inline::<B>(text), &children(), &mut out);
            }
            BlockKind::Quote { text } => B::quote(&inline::<B>(text), &children(), &mut out),
            BlockKind::Callout { icon, text } => {
                B::callout(icon.as_deref(), &inline::<B>(text), &children(), &mut out);
            }
            BlockKind::Code { language, text } => {
                B::code_block(language.as_deref(), &RichText::plain_text(text), &mut out);
                trailing = true;
            }
            BlockKind::Table {
                has_column_header,
                has_row_header,
            } => {
                let rows: Vec<Vec<String>> = block
                    .children
                    .iter()
                    .filter_map(|child| match &child.kind {
                        BlockKind::TableRow { cells } => {
                            Some(cells.iter().map(|cell| inline::<B>(cell)).collect())
                        }
                        _ => None,
                    })
                    .collect();
                if rows.is_empty() {
                    B::table_placeholder(&mut out);
                } else {
                    B::table(*has_column_header, *has_row_header, &rows, &mut out);
                }
            }
            BlockKind::Image { url, caption } => {
                B::image(url, &inline::<B>(caption), &mut out);
                trailing = true;
            }
            BlockKind::File { url, name } => {
                B::file(url, name, &mut out);
                trailing = true;
            }
            BlockKind::ToDo { checked, text } => {
                B::to_do(*checked, &inline::<B>(text), &children(), &mut out);
            }
            BlockKind::Equation { expression } => {
                B::equation(expression, &mut out);
                trailing = true;
            }
            BlockKind::Divider => {
                B::divider(&mut out);
                trailing = true;
            }
            BlockKind::Toggle { text } => B::toggle(&inline::<B>(text), &children(), &mut out),
            BlockKind::TableRow { .. } | BlockKind::Unsupported { .. } => {
                B::unsupported(block.kind.type_name(), &mut out);
                trailing = true;
            }
        }
        if trailing && !block.children.is_empty() {
            B::trailing_children(&children(), &mut out);
        }
        out
    }

    fn render_children(&self, children: &[Block], depth: usize) -> String {
        if children.is_empty() {
            return String::new();
        }
        self.render_sequence(children, depth + 1).concat()
    }
}

impl<B: RenderBackend> Default for BlockRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Emit the open list run, if any.
fn flush<B: RenderBackend>(group: &mut Option<OpenGroup>, parts: &mut Vec<String>) {
    if let Some(open) = group.take() {
        let mut out = String::new();
        B::list(open.kind, &open.items, &mut out);
        parts.push(out);
    }
}

fn inline<B: RenderBackend>(spans: &[RichText]) -> String {
    let mut out = String::new();
    for span in spans {
        B::span(span, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlBackend;
    use pretty_assertions::assert_eq;

    fn render_html(blocks: &[Block]) -> String {
        BlockRenderer::<HtmlBackend>::new().render(blocks)
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(render_html(&[]), "");
    }

    #[test]
    fn test_run_split_by_paragraph() {
        let blocks = [
            Block::bulleted("a"),
            Block::bulleted("b"),
            Block::paragraph("c"),
            Block::bulleted("d"),
        ];
        assert_eq!(
            render_html(&blocks),
            "<ul><li>a</li><li>b</li></ul>\n<p>c</p>\n<ul><li>d</li></ul>"
        );
    }

    #[test]
    fn test_kind_switch_closes_group() {
        let blocks = [Block::bulleted("a"), Block::numbered("b")];
        assert_eq!(render_html(&blocks), "<ul><li>a</li></ul>\n<ol><li>b</li></ol>");
    }

    #[test]
    fn test_numbered_run_then_bulleted_run() {
        let blocks = [
            Block::numbered("1"),
            Block::numbered("2"),
            Block::numbered("3"),
            Block::bulleted("x"),
            Block::bulleted("y"),
        ];
        let html = render_html(&blocks);
        assert_eq!(html.matches("<ol>").count(), 1);
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(
            html,
            "<ol><li>1</li><li>2</li><li>3</li></ol>\n<ul><li>x</li><li>y</li></ul>"
        );
    }

    #[test]
    fn test_nested_list_rendered_inside_item() {
        let blocks = [Block::bulleted("parent")
            .with_children(vec![Block::numbered("child 1"), Block::numbered("child 2")])];
        assert_eq!(
            render_html(&blocks),
            "<ul><li>parent<ol><li>child 1</li><li>child 2</li></ol></li></ul>"
        );
    }

    #[test]
    fn test_nested_callout_children() {
        let blocks = [Block::new(BlockKind::Callout {
            icon: Some("💡".to_owned()),
            text: vec![RichText::plain("Note")],
        })
        .with_children(vec![Block::paragraph("inner")])];
        assert_eq!(
            render_html(&blocks),
            r#"<div class="callout"><span class="callout-icon">💡</span><div class="callout-content">Note<p>inner</p></div></div>"#
        );
    }

    #[test]
    fn test_unsupported_block_placeholder() {
        let blocks = [
            Block::paragraph("before"),
            Block::new(BlockKind::Unsupported {
                kind: "synced_block".to_owned(),
            }),
            Block::paragraph("after"),
        ];
        assert_eq!(
            render_html(&blocks),
            "<p>before</p>\n<div class=\"unknown-block\">Unsupported block type: synced_block</div>\n<p>after</p>"
        );
    }

    #[test]
    fn test_heading_level_clamped() {
        let blocks = [Block::new(BlockKind::Heading {
            level: 5,
            text: vec![RichText::plain("Deep")],
        })];
        assert_eq!(render_html(&blocks), "<h3>Deep</h3>");
    }

    #[test]
    fn test_table_rows_from_children() {
        let row = |a: &str, b: &str| {
            Block::new(BlockKind::TableRow {
                cells: vec![vec![RichText::plain(a)], vec![RichText::plain(b)]],
            })
        };
        let blocks = [Block::new(BlockKind::Table {
            has_column_header: true,
            has_row_header: false,
        })
        .with_children(vec![row("Name", "Value"), row("k", "v")])];
        assert_eq!(
            render_html(&blocks),
            r#"<div class="table-wrapper"><table class="notion-table"><tr><th>Name</th><th>Value</th></tr><tr><td>k</td><td>v</td></tr></table></div>"#
        );
    }

    #[test]
    fn test_table_without_rows_placeholder() {
        let blocks = [Block::new(BlockKind::Table {
            has_column_header: false,
            has_row_header: false,
        })];
        assert!(render_html(&blocks).contains("table-placeholder"));
    }

    #[test]
    fn test_depth_guard_emits_marker() {
        let mut block = Block::paragraph("leaf");
        for _ in 0..5 {
            block = Block::new(BlockKind::Toggle {
                text: vec![RichText::plain("level")],
            })
            .with_children(vec![block]);
        }
        let html = BlockRenderer::<HtmlBackend>::new()
            .with_max_depth(2)
            .render(&[block]);
        assert!(html.contains(r#"<div class="render-error">"#));
        assert!(!html.contains("leaf"));
        assert_eq!(html.matches("<details").count(), 3);
    }

    #[test]
    fn test_source_order_preserved() {
        let blocks = [
            Block::paragraph("one"),
            Block::new(BlockKind::Divider),
            Block::paragraph("two"),
        ];
        assert_eq!(render_html(&blocks), "<p>one</p>\n<hr>\n<p>two</p>");
    }

    #[test]
    fn test_heading_children_rendered_after_heading() {
        let blocks = [Block::new(BlockKind::Heading {
            level: 2,
            text: vec![RichText::plain("Section")],
        })
        .with_children(vec![Block::paragraph("hidden body")])];
        assert_eq!(
            render_html(&blocks),
            r#"<h2>Section</h2><div class="block-children"><p>hidden body</p></div>"#
        );
    }

    #[test]
    fn test_leaf_kinds_keep_children() {
        let leaves = [
            BlockKind::Code {
                language: None,
                text: vec![RichText::plain("x")],
            },
            BlockKind::Image {
                url: "https://img.example.com/a.png".to_owned(),
                caption: vec![],
            },
            BlockKind::File {
                url: "https://files.example.com/a.pdf".to_owned(),
                name: "a.pdf".to_owned(),
            },
            BlockKind::Equation {
                expression: "x".to_owned(),
            },
            BlockKind::Divider,
            BlockKind::Unsupported {
                kind: "column_list".to_owned(),
            },
        ];
        for kind in leaves {
            let name = kind.type_name().to_owned();
            let html = render_html(&[
                Block::new(kind).with_children(vec![Block::paragraph("nested body")])
            ]);
            assert!(
                html.ends_with(r#"<div class="block-children"><p>nested body</p></div>"#),
                "{name}: {html}"
            );
        }
    }

    #[test]
    fn test_leaf_without_children_has_no_wrapper() {
        let html = render_html(&[Block::new(BlockKind::Divider)]);
        assert_eq!(html, "<hr>");
    }

    #[test]
    fn test_code_block_uses_plain_text() {
        let blocks = [Block::new(BlockKind::Code {
            language: None,
            text: vec![RichText::plain("a < b"), RichText::plain(" && c")],
        })];
        assert_eq!(
            render_html(&blocks),
            r#"<div class="code-block"><pre><code>a &lt; b &amp;&amp; c</code></pre></div>"#
        );
    }
}
