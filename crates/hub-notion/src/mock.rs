//! Mock remote source for testing.
//!
//! Provides [`MockSource`] for exercising the fetcher, reconciler and
//! pipeline without network access.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde_json::json;

use crate::error::NotionError;
use crate::source::RemoteSource;
use crate::types::{BlockChildrenResponse, PageObject, QueryResponse, WireBlock};

/// In-memory remote source.
///
/// Serves records and block children in pages of `page_size`, using the
/// offset of the next item as cursor. Property updates modify the stored
/// records, so a second run observes what the first one wrote.
///
/// # Example
///
/// ```ignore
/// use hub_notion::{MockPage, MockSource, mock_text_block};
///
/// let source = MockSource::new()
///     .with_page(MockPage::new("page-1").title("Guide").publish(true).build())
///     .with_children("page-1", vec![mock_text_block("b1", "paragraph", "Hello")]);
/// ```
#[derive(Debug)]
pub struct MockSource {
    pages: RwLock<Vec<PageObject>>,
    children: HashMap<String, Vec<WireBlock>>,
    page_size: usize,
    fail_query: bool,
    failing_children: HashSet<String>,
    /// Block ID -> number of child pages served before listings fail.
    failing_children_after: HashMap<String, usize>,
    failing_updates: HashSet<String>,
    updates: RwLock<Vec<(String, String, String)>>,
    query_calls: RwLock<usize>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self {
            pages: RwLock::new(Vec::new()),
            children: HashMap::new(),
            page_size: 100,
            fail_query: false,
            failing_children: HashSet::new(),
            failing_children_after: HashMap::new(),
            failing_updates: HashSet::new(),
            updates: RwLock::new(Vec::new()),
            query_calls: RwLock::new(0),
        }
    }
}

impl MockSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, page: PageObject) -> Self {
        self.pages.write().unwrap().push(page);
        self
    }

    /// Set the children of a record or block.
    ///
    /// Listed blocks report `has_children` when children are registered for them.
    #[must_use]
    pub fn with_children(mut self, parent_id: impl Into<String>, blocks: Vec<WireBlock>) -> Self {
        self.children.insert(parent_id.into(), blocks);
        self
    }

    /// Set the number of items served per page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make every database query fail.
    #[must_use]
    pub fn with_failing_query(mut self) -> Self {
        self.fail_query = true;
        self
    }

    /// Make child listings of `block_id` fail.
    #[must_use]
    pub fn with_failing_children(mut self, block_id: impl Into<String>) -> Self {
        self.failing_children.insert(block_id.into());
        self
    }

    /// Serve `pages` pages of children of `block_id`, then fail the next request.
    #[must_use]
    pub fn with_failing_children_after(mut self, block_id: impl Into<String>, pages: usize) -> Self {
        self.failing_children_after.insert(block_id.into(), pages);
        self
    }

    /// Make property updates of `page_id` fail.
    #[must_use]
    pub fn with_failing_update(mut self, page_id: impl Into<String>) -> Self {
        self.failing_updates.insert(page_id.into());
        self
    }

    /// Property updates applied so far, as `(page_id, property, value)`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn updates(&self) -> Vec<(String, String, String)> {
        self.updates.read().unwrap().clone()
    }

    /// Number of database query requests served.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn query_calls(&self) -> usize {
        *self.query_calls.read().unwrap()
    }

    /// Remove a record, as if it were deleted remotely.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_page(&self, page_id: &str) {
        self.pages.write().unwrap().retain(|p| p.id != page_id);
    }

    /// Replace a property of a stored record.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_property(&self, page_id: &str, name: &str, value: serde_json::Value) {
        let mut pages = self.pages.write().unwrap();
        if let Some(page) = pages.iter_mut().find(|p| p.id == page_id) {
            page.properties.set(name, value);
        }
    }

    fn offset(cursor: Option<&str>) -> usize {
        cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0)
    }

    fn window<T: Clone>(&self, items: &[T], cursor: Option<&str>) -> (Vec<T>, bool, Option<String>) {
        let start = Self::offset(cursor);
        let end = (start + self.page_size).min(items.len());
        let slice = items.get(start..end).unwrap_or_default().to_vec();
        let has_more = end < items.len();
        (slice, has_more, has_more.then(|| end.to_string()))
    }
}

fn server_error(what: &str) -> NotionError {
    NotionError::HttpResponse {
        status: 500,
        body: format!("mock failure: {what}"),
    }
}

impl RemoteSource for MockSource {
    fn query_database(&self, cursor: Option<&str>) -> Result<QueryResponse, NotionError> {
        *self.query_calls.write().unwrap() += 1;
        if self.fail_query {
            return Err(server_error("query"));
        }
        let pages = self.pages.read().unwrap();
        let (results, has_more, next_cursor) = self.window(pages.as_slice(), cursor);
        Ok(QueryResponse {
            results,
            has_more,
            next_cursor,
        })
    }

    fn list_block_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<BlockChildrenResponse, NotionError> {
        if self.failing_children.contains(block_id) {
            return Err(server_error(block_id));
        }
        if let Some(&pages) = self.failing_children_after.get(block_id)
            && Self::offset(cursor) / self.page_size >= pages
        {
            return Err(server_error(block_id));
        }
        let blocks = self.children.get(block_id).map_or(&[][..], Vec::as_slice);
        let (mut results, has_more, next_cursor) = self.window(blocks, cursor);
        for block in &mut results {
            block.has_children = self.children.contains_key(&block.id);
        }
        Ok(BlockChildrenResponse {
            results,
            has_more,
            next_cursor,
        })
    }

    fn update_rich_text_property(
        &self,
        page_id: &str,
        property: &str,
        value: &str,
    ) -> Result<(), NotionError> {
        if self.failing_updates.contains(page_id) {
            return Err(NotionError::HttpResponse {
                status: 409,
                body: format!("conflict updating {page_id}"),
            });
        }
        self.set_property(page_id, property, rich_text_property(value));
        self.updates.write().unwrap().push((
            page_id.to_owned(),
            property.to_owned(),
            value.to_owned(),
        ));
        Ok(())
    }
}

fn rich_text_property(value: &str) -> serde_json::Value {
    json!({
        "type": "rich_text",
        "rich_text": [{"type": "text", "plain_text": value, "text": {"content": value}}]
    })
}

/// Builder for mock records.
#[derive(Debug, Clone)]
pub struct MockPage {
    page: PageObject,
}

impl MockPage {
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            page: PageObject {
                id: id.to_owned(),
                created_time: Some("2026-01-01T00:00:00.000Z".to_owned()),
                last_edited_time: Some("2026-01-01T00:00:00.000Z".to_owned()),
                url: Some(format!("https://www.notion.so/{id}")),
                properties: crate::types::OrderedProperties::default(),
            },
        }
    }

    /// Set the `TITLE` field.
    #[must_use]
    pub fn title(self, title: &str) -> Self {
        self.property(
            "TITLE",
            json!({"type": "title", "title": [{"type": "text", "plain_text": title}]}),
        )
    }

    /// Set the `PUBLISH` checkbox.
    #[must_use]
    pub fn publish(self, published: bool) -> Self {
        self.property("PUBLISH", json!({"type": "checkbox", "checkbox": published}))
    }

    /// Set the `DOC_ID` field.
    #[must_use]
    pub fn public_id(self, public_id: &str) -> Self {
        self.property("DOC_ID", rich_text_property(public_id))
    }

    /// Set a select property.
    #[must_use]
    pub fn select(self, name: &str, option: &str) -> Self {
        self.property(name, json!({"type": "select", "select": {"name": option}}))
    }

    /// Set a multi-select property.
    #[must_use]
    pub fn multi_select(self, name: &str, options: &[&str]) -> Self {
        let options: Vec<_> = options.iter().map(|o| json!({"name": o})).collect();
        self.property(name, json!({"type": "multi_select", "multi_select": options}))
    }

    /// Set a rich text property.
    #[must_use]
    pub fn text(self, name: &str, value: &str) -> Self {
        self.property(name, rich_text_property(value))
    }

    /// Set a raw property object.
    #[must_use]
    pub fn property(mut self, name: &str, value: serde_json::Value) -> Self {
        self.page.properties.set(name, value);
        self
    }

    #[must_use]
    pub fn build(self) -> PageObject {
        self.page
    }
}

/// Build a block with a raw payload.
#[must_use]
pub fn mock_block(id: &str, kind: &str, payload: serde_json::Value) -> WireBlock {
    let mut rest = serde_json::Map::new();
    rest.insert(kind.to_owned(), payload);
    WireBlock {
        id: id.to_owned(),
        kind: kind.to_owned(),
        has_children: false,
        rest,
    }
}

/// Build a text block (`paragraph`, `quote`, list items, headings, ...).
#[must_use]
pub fn mock_text_block(id: &str, kind: &str, text: &str) -> WireBlock {
    mock_block(
        id,
        kind,
        json!({"rich_text": [{"type": "text", "plain_text": text}]}),
    )
}
