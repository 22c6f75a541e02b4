use exp3_identity::AuthError;
use thiserror::Error;

/// Errors that can occur in this crate.
///
/// The `Display` text is what the sign-in modal shows.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The identity provider rejected the sign-in.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The provider finished without returning a user.
    #[error("No user data received")]
    NoUserData,

    /// The profile could not be created or read.
    #[error(transparent)]
    Profile(#[from] exp3_profiles::Error),

    /// Sign-out failed.
    #[error("Failed to sign out. Please try again.")]
    SignOut(AuthError),

    /// The page origin is not on the sign-in allow-list.
    #[error("Unauthorized domain: {0}")]
    UnauthorizedOrigin(String),
}
