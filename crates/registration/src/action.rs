use std::fmt;

/// The register button shown on an event card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallToAction {
    /// Registered, and the event has a meeting to join.
    JoinMeeting,

    /// Registered, nothing more to do.
    Registered,

    /// Registration happens on an external site.
    RegisterExternal {
        /// Host of the external registration page.
        host: String,
    },

    /// The event needs a signed-in session first.
    ConnectToRegister,

    /// Registration can start right away.
    RegisterNow,
}

impl CallToAction {
    /// Whether the button can be pressed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !matches!(self, Self::Registered)
    }
}

impl fmt::Display for CallToAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JoinMeeting => write!(f, "Join Meeting"),
            Self::Registered => write!(f, "Registered"),
            Self::RegisterExternal { host } => write!(f, "Register on {host}"),
            Self::ConnectToRegister => write!(f, "Connect to Register"),
            Self::RegisterNow => write!(f, "Register Now"),
        }
    }
}
