use serde::{Deserialize, Serialize};

/// An authenticated user as reported by the identity provider.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserIdentity {
    /// Provider-assigned user ID.
    pub id: String,

    /// Display name.
    pub name: Option<String>,

    /// Email address.
    pub email: Option<String>,

    /// Avatar image URL.
    pub avatar: Option<String>,
}

impl UserIdentity {
    /// Creates an identity with only an ID set.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
            avatar: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the avatar URL.
    #[must_use]
    pub fn with_avatar<S: Into<String>>(mut self, avatar: S) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Name to show in the UI, falling back to the email and then the ID.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}
