use thiserror::Error;

/// Failures reported by the identity provider.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The browser blocked the sign-in popup.
    #[error("Popup was blocked. Please allow popups or try again.")]
    PopupBlocked,

    /// A newer popup request superseded this one.
    #[error("Authentication was cancelled. Please try again.")]
    PopupCancelled,

    /// The provider refused the current domain.
    #[error("This domain is not authorized for authentication.")]
    UnauthorizedDomain,

    /// The user closed the popup before finishing.
    #[error("Authentication window was closed. Please try again.")]
    PopupClosed,

    /// The provider could not be reached.
    #[error("A network error occurred. Please check your connection and try again.")]
    Network,

    /// The provider failed internally.
    #[error("An internal authentication error occurred. Please try again.")]
    Internal,

    /// Any other failure, with the provider's message if it gave one.
    #[error("{}", .0.as_deref().unwrap_or("Authentication failed. Please try again."))]
    Other(Option<String>),
}

impl AuthError {
    /// Maps a provider error code (such as `auth/popup-blocked`) and optional
    /// message to a variant.
    #[must_use]
    pub fn from_code(code: &str, message: Option<String>) -> Self {
        match code {
            "auth/popup-blocked" => Self::PopupBlocked,
            "auth/cancelled-popup-request" => Self::PopupCancelled,
            "auth/unauthorized-domain" => Self::UnauthorizedDomain,
            "auth/popup-closed-by-user" => Self::PopupClosed,
            "auth/network-request-failed" => Self::Network,
            "auth/internal-error" => Self::Internal,
            _ => Self::Other(message.filter(|m| !m.is_empty())),
        }
    }

    /// The provider error code for this variant, if it has one.
    #[must_use]
    pub const fn code(&self) -> Option<&'static str> {
        match self {
            Self::PopupBlocked => Some("auth/popup-blocked"),
            Self::PopupCancelled => Some("auth/cancelled-popup-request"),
            Self::UnauthorizedDomain => Some("auth/unauthorized-domain"),
            Self::PopupClosed => Some("auth/popup-closed-by-user"),
            Self::Network => Some("auth/network-request-failed"),
            Self::Internal => Some("auth/internal-error"),
            Self::Other(_) => None,
        }
    }

    /// True for failures where the popup flow should be retried once as a
    /// redirect flow instead of being reported.
    #[must_use]
    pub const fn should_fall_back_to_redirect(&self) -> bool {
        matches!(self, Self::PopupBlocked | Self::UnauthorizedDomain)
    }
}
