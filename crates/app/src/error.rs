use thiserror::Error;

/// Errors that can occur in this crate.
///
/// Errors from the underlying managers pass through unchanged so their
/// messages reach the user as written.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Event catalog error.
    #[error(transparent)]
    Events(#[from] exp3_events::Error),

    /// A featured event link could not be parsed.
    #[error("invalid featured event link: {0}")]
    InvalidLink(#[from] url::ParseError),

    /// The operation needs a signed-in user.
    #[error("Please sign in first")]
    NotSignedIn,

    /// Sign-in was requested while the sign-in modal is closed.
    #[error("Sign-in is not open")]
    SignInNotOpen,

    /// Profile error.
    #[error(transparent)]
    Profile(#[from] exp3_profiles::Error),

    /// Registration workflow error.
    #[error(transparent)]
    Registration(#[from] exp3_registration::Error),

    /// Session error.
    #[error(transparent)]
    Session(#[from] exp3_sessions::Error),
}
