//! Render backend trait for format-specific rendering.
//!
//! The generic [`BlockRenderer`](crate::BlockRenderer) walks the tree, groups
//! list items and recurses into children. Everything that decides the shape
//! of the output for a single block lives behind this trait.

use crate::block::{ListKind, RichText};

/// Backend trait for format-specific rendering operations.
///
/// Every method writes to `out`. Arguments named `inline` are already-rendered
/// rich text; `children` is the already-rendered child sequence (possibly empty).
pub trait RenderBackend {
    /// Render one rich text span.
    fn span(span: &RichText, out: &mut String);

    /// Wrap rendered list items in their container.
    fn list(kind: ListKind, items: &[String], out: &mut String);

    /// Render a list item (either kind).
    fn list_item(inline: &str, children: &str, out: &mut String);

    fn paragraph(inline: &str, children: &str, out: &mut String);

    /// Render a heading. `level` is clamped to 1..=3 by the caller.
    fn heading(level: u8, inline: &str, children: &str, out: &mut String);

    fn quote(inline: &str, children: &str, out: &mut String);

    fn callout(icon: Option<&str>, inline: &str, children: &str, out: &mut String);

    /// Render a code block from its raw (unescaped) source.
    fn code_block(language: Option<&str>, source: &str, out: &mut String);

    /// Render a table from rendered cell contents, row by row.
    fn table(has_column_header: bool, has_row_header: bool, rows: &[Vec<String>], out: &mut String);

    /// Render a table whose rows are unavailable.
    fn table_placeholder(out: &mut String);

    fn image(url: &str, caption: &str, out: &mut String);

    fn file(url: &str, name: &str, out: &mut String);

    fn to_do(checked: bool, inline: &str, children: &str, out: &mut String);

    /// Render a display equation from its LaTeX source.
    fn equation(expression: &str, out: &mut String);

    fn divider(out: &mut String);

    fn toggle(summary: &str, children: &str, out: &mut String);

    /// Render the children of a block whose own rule has no place for them.
    ///
    /// Called after the block itself, only when `children` is non-empty.
    fn trailing_children(children: &str, out: &mut String);

    /// Render a visible placeholder for a block kind without a rule.
    fn unsupported(kind: &str, out: &mut String);

    /// Render a visible marker where nesting exceeded the depth limit.
    fn depth_exceeded(limit: usize, out: &mut String);
}
