use exp3_store::StoreError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// The store has been marked unavailable.
    #[error("document store unavailable")]
    Unavailable,
}

impl StoreError for Error {}
