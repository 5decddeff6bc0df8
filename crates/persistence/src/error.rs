//! Store error type.

use thiserror::Error;

/// Errors returned by an [`EntityStore`](crate::EntityStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint on `field` would be violated.
    #[error("A record with this {field} already exists")]
    Conflict { field: &'static str },

    /// The backend could not complete the operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
