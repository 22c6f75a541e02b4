use thiserror::Error;

/// Errors that can occur in this crate.
///
/// The `Display` text is suitable for showing to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The user is already in the event's registered users.
    #[error("Already registered for this event")]
    AlreadyRegistered,

    /// An event with the requested ID already exists.
    #[error("Event already exists: {0}")]
    AlreadyExists(String),

    /// A stored record could not be encoded or decoded.
    #[error("event record codec error: {0}")]
    Codec(String),

    /// The event has reached its attendee limit.
    #[error("Event is full")]
    Full,

    /// No event with the given ID exists.
    #[error("Event not found")]
    NotFound(String),

    /// The user is not in the event's registered users.
    #[error("Not registered for this event")]
    NotRegistered,

    /// Errors passed through from the underlying document store.
    #[error("event store error: {0}")]
    Store(String),
}
