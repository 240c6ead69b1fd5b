//! Identity state: counter and mapping.

use std::collections::{BTreeMap, HashMap};

use crate::error::IdentityError;
use crate::scheme::IdScheme;

/// Counter and mapping, owned by the caller across a reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityState {
    /// Highest ordinal ever assigned or observed.
    pub counter: u64,
    /// Remote ID to public ID.
    pub mapping: BTreeMap<String, String>,
}

impl IdentityState {
    /// Counter to continue from: the stored counter, raised to the highest
    /// ordinal present in the mapping.
    #[must_use]
    pub fn effective_counter(&self) -> u64 {
        self.mapping
            .values()
            .filter_map(|id| IdScheme::ordinal_of(id))
            .fold(self.counter, u64::max)
    }

    /// Reject mappings that give one public ID to two records.
    pub fn check_unique(&self) -> Result<(), IdentityError> {
        let mut seen: HashMap<&str, &str> = HashMap::with_capacity(self.mapping.len());
        for (remote_id, public_id) in &self.mapping {
            if let Some(first) = seen.insert(public_id, remote_id) {
                return Err(IdentityError::DuplicatePublicId {
                    public_id: public_id.clone(),
                    first: first.to_owned(),
                    second: remote_id.clone(),
                });
            }
        }
        Ok(())
    }
}
