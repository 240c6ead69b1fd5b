//! Content tree renderer with pluggable backends.
//!
//! This crate provides the [`Block`] tree model and a generic
//! [`BlockRenderer`] that turns a block sequence into a single fragment using
//! the [`RenderBackend`] trait.
//!
//! # Architecture
//!
//! - [`BlockRenderer`] owns traversal: source order, recursion into children,
//!   the nesting limit, and grouping of adjacent list items into one container.
//! - [`HtmlBackend`] decides the markup of each individual block.
//!
//! # Example
//!
//! ```
//! use hub_renderer::{Block, BlockRenderer, HtmlBackend};
//!
//! let blocks = vec![Block::bulleted("one"), Block::bulleted("two"), Block::paragraph("end")];
//! let html = BlockRenderer::<HtmlBackend>::new().render(&blocks);
//! assert_eq!(html, "<ul><li>one</li><li>two</li></ul>\n<p>end</p>");
//! ```

mod backend;
mod block;
mod escape;
mod html;
mod renderer;

pub use backend::RenderBackend;
pub use block::{Annotations, Block, BlockKind, ListKind, RichText};
pub use escape::escape_html;
pub use html::HtmlBackend;
pub use renderer::{BlockRenderer, DEFAULT_MAX_DEPTH};
