use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The origin URL has no host component.
    #[error("origin has no host: {0}")]
    MissingHost(String),

    /// The origin could not be parsed as a URL.
    #[error("invalid origin: {0}")]
    InvalidOrigin(String),
}
