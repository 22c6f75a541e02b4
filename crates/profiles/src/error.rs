use thiserror::Error;

/// Errors that can occur when managing user profiles.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A stored profile could not be encoded or decoded.
    #[error("profile codec error: {0}")]
    Codec(String),

    /// The profile could not be created or updated at sign-in.
    #[error("Failed to create/update user profile")]
    CreateFailed,

    /// No profile exists for the user.
    #[error("User not found")]
    NotFound(String),

    /// Profile store error.
    #[error("profile store error: {0}")]
    ProfileStore(String),
}
