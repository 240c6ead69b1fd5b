//! Stable public identifiers for remote records.
//!
//! Each remote record is assigned a public ID (`DOC-0001`) exactly once.
//! Three copies of identity data are kept consistent across runs: the local
//! mapping, the local counter, and a field on the remote record itself.
//!
//! - [`decide`] is the per-record decision table (pure).
//! - [`Reconciler`] applies it to a batch, writing repairs through an
//!   [`IdentitySink`].
//! - [`IdentityState`] is the counter and mapping the caller loads before a
//!   pass and persists after it.

mod decision;
mod error;
mod reconciler;
mod scheme;
mod state;

pub use decision::{Action, Decision, Observation, decide};
pub use error::IdentityError;
pub use reconciler::{
    Assignment, IdentityInput, IdentitySink, ReconcileReport, Reconciled, Reconciler, RemoteField,
};
pub use scheme::IdScheme;
pub use state::IdentityState;
