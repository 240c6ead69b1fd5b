//! Paginated collection and content tree retrieval.

use hub_renderer::Block;

use crate::error::NotionError;
use crate::source::RemoteSource;
use crate::types::PageObject;

/// Default nesting limit for recursive tree fetches.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Content tree retrieved for one record.
#[derive(Debug, Default)]
pub struct FetchedTree {
    pub blocks: Vec<Block>,
    /// Subtree listings that failed; the tree is partial when non-zero.
    pub errors: usize,
}

/// Retrieves whole collections and content trees despite page limits.
///
/// Follows the cursor protocol: request the next page with the opaque cursor
/// of the previous response until the source reports no more pages.
pub struct Fetcher<'a, S: RemoteSource> {
    source: &'a S,
    max_depth: usize,
}

impl<'a, S: RemoteSource> Fetcher<'a, S> {
    #[must_use]
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Set the nesting depth below which children are not fetched.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Retrieve every record of the collection.
    ///
    /// # Errors
    ///
    /// Any failed page aborts the whole retrieval.
    pub fn fetch_pages(&self) -> Result<Vec<PageObject>, NotionError> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let response = self.source.query_database(cursor.as_deref())?;
            pages.extend(response.results);

            match (response.has_more, response.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                (true, None) => {
                    tracing::warn!("source reported more results without a cursor, stopping");
                    break;
                }
                (false, _) => break,
            }
        }

        tracing::info!(count = pages.len(), "fetched records");
        Ok(pages)
    }

    /// Retrieve the content tree under `block_id`, depth-first.
    ///
    /// A failed listing stops only that subtree: blocks collected before the
    /// failure are kept and the failure is counted in [`FetchedTree::errors`].
    pub fn fetch_tree(&self, block_id: &str) -> FetchedTree {
        let mut errors = 0;
        let blocks = self.fetch_children(block_id, 0, &mut errors);
        FetchedTree { blocks, errors }
    }

    fn fetch_children(&self, block_id: &str, depth: usize, errors: &mut usize) -> Vec<Block> {
        let mut wire_blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            match self.source.list_block_children(block_id, cursor.as_deref()) {
                Ok(response) => {
                    wire_blocks.extend(response.results);
                    match (response.has_more, response.next_cursor) {
                        (true, Some(next)) => cursor = Some(next),
                        _ => break,
                    }
                }
                Err(e) => {
                    tracing::error!(block_id, "failed to list children: {e}");
                    *errors += 1;
                    break;
                }
            }
        }

        wire_blocks
            .iter()
            .map(|wire| {
                let block = wire.to_block();
                if !wire.has_children {
                    return block;
                }
                if depth + 1 > self.max_depth {
                    tracing::warn!(
                        block_id = %wire.id,
                        max_depth = self.max_depth,
                        "content nested too deeply, children not fetched"
                    );
                    return block;
                }
                let children = self.fetch_children(&wire.id, depth + 1, errors);
                block.with_children(children)
            })
            .collect()
    }
}
