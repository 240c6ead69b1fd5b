//! Static portal generation for the document hub.
//!
//! - [`PageTemplate`] validates a document template and substitutes values in one pass
//! - [`DocumentAssembler`] renders a cached [`hub_store::Snapshot`] into a full page
//! - [`IndexBuilder`] paginates published records into `index.html`, `page-2.html`, ...
//! - [`search_entries`] builds the client-side search index
//! - [`remove_orphan_pages`] prunes pages of records that are no longer published
//! - [`SiteBuilder`] ties these to the public directory
//!
//! # Output layout
//!
//! ```text
//! public/
//! +-- index.html
//! +-- page-2.html
//! +-- search-index.json
//! +-- documents/
//!     +-- DOC-0001.html
//! ```

mod builder;
mod cleanup;
mod document;
mod error;
mod index;
mod search;
mod template;

pub use builder::{
    DOCUMENTS_DIR, RenderReport, SEARCH_INDEX_FILE, SiteBuilder, SiteOptions, load_template,
};
pub use cleanup::remove_orphan_pages;
pub use document::{DocumentAssembler, property_table};
pub use error::SiteError;
pub use index::{
    INDEX_FILE, IndexBuilder, IndexPage, ListingFields, listing_order, page_count,
    page_file_name, pagination_html,
};
pub use search::{SearchEntry, search_entries};
pub use template::{
    DEFAULT_DOCUMENT_TEMPLATE, PageTemplate, PageValues, Placeholder, TemplateError,
};
