//! Error types for identity state.

/// Identity state error.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Mapping assigns one public ID to more than one record.
    #[error("Public ID {public_id} is mapped to both {first} and {second}")]
    DuplicatePublicId {
        public_id: String,
        first: String,
        second: String,
    },
}
