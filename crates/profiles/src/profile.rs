use std::collections::BTreeSet;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use exp3_identity::UserIdentity;
use serde::{Deserialize, Serialize};

/// A persisted user profile.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Provider-assigned user ID.
    pub id: String,

    /// Display name.
    pub name: Option<String>,

    /// Email address.
    pub email: Option<String>,

    /// Avatar image URL.
    pub avatar: Option<String>,

    /// First sign-in.
    pub created_at: DateTime<Utc>,

    /// Most recent sign-in.
    pub last_login_at: DateTime<Utc>,

    /// Accumulated experience points.
    pub xp: u64,

    /// IDs of events the user registered for.
    pub registered_events: BTreeSet<String>,
}

impl UserProfile {
    pub(crate) fn new(identity: UserIdentity, now: DateTime<Utc>) -> Self {
        Self {
            id: identity.id,
            name: identity.name,
            email: identity.email,
            avatar: identity.avatar,
            created_at: now,
            last_login_at: now,
            xp: 0,
            registered_events: BTreeSet::new(),
        }
    }

    /// The identity fields of the profile.
    #[must_use]
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl TryFrom<Bytes> for UserProfile {
    type Error = ciborium::de::Error<std::io::Error>;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        ciborium::de::from_reader(bytes.as_ref())
    }
}

impl TryInto<Bytes> for UserProfile {
    type Error = ciborium::ser::Error<std::io::Error>;

    fn try_into(self) -> Result<Bytes, Self::Error> {
        let mut writer = Vec::new();
        ciborium::ser::into_writer(&self, &mut writer)?;
        Ok(Bytes::from(writer))
    }
}
