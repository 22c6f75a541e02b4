use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No event exists at the given position in the catalog.
    #[error("no event at index {0}")]
    UnknownEvent(usize),
}
