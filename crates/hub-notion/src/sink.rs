//! Writes public IDs back to the remote source.

use hub_identity::IdentitySink;

use crate::error::NotionError;
use crate::source::RemoteSource;

/// [`IdentitySink`] that stores public IDs in a rich text property.
pub struct RemoteIdSink<'a, S: RemoteSource> {
    source: &'a S,
    property: &'a str,
}

impl<'a, S: RemoteSource> RemoteIdSink<'a, S> {
    #[must_use]
    pub fn new(source: &'a S, property: &'a str) -> Self {
        Self { source, property }
    }
}

impl<S: RemoteSource> IdentitySink for RemoteIdSink<'_, S> {
    type Error = NotionError;

    fn write_public_id(&mut self, remote_id: &str, public_id: &str) -> Result<(), NotionError> {
        self.source
            .update_rich_text_property(remote_id, self.property, public_id)
    }
}
