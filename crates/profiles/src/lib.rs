//! Manages persisted user profiles.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod profile;

pub use error::Error;
pub use profile::UserProfile;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use exp3_identity::UserIdentity;
use exp3_store::{Collection, DocumentStore};
use tracing::{debug, error, info};

/// Collection holding user profiles.
pub const USERS_COLLECTION: &str = "users";

/// Options for creating a new `ProfileManager`.
pub struct ProfileManagerOptions<S>
where
    S: DocumentStore,
{
    /// The document store holding the users collection.
    pub store: S,
}

/// Trait for managing user profiles.
#[async_trait]
pub trait ProfileManagement
where
    Self: Clone + Send + Sync + 'static,
{
    /// Document store type.
    type Store: DocumentStore;

    /// Creates a new instance of the profile manager.
    fn new(options: ProfileManagerOptions<Self::Store>) -> Self;

    /// Creates the profile on first sign-in, or bumps its last-login time on
    /// later sign-ins. Returns the stored profile.
    async fn create_or_touch_profile(&self, identity: UserIdentity) -> Result<UserProfile, Error>;

    /// Gets a profile by user ID.
    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, Error>;

    /// Sets the user's XP to `amount`.
    async fn set_xp(&self, user_id: &str, amount: u64) -> Result<(), Error>;

    /// Records that the user registered for an event.
    async fn add_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), Error>;

    /// Forgets a registration recorded with `add_registered_event`.
    async fn remove_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), Error>;
}

/// Manages user profiles.
#[derive(Clone, Debug)]
pub struct ProfileManager<S>
where
    S: DocumentStore,
{
    users: S::Collection,
}

impl<S> ProfileManager<S>
where
    S: DocumentStore,
{
    async fn load(&self, user_id: &str) -> Result<Option<UserProfile>, Error> {
        let bytes = self
            .users
            .get(user_id)
            .await
            .map_err(|e| Error::ProfileStore(e.to_string()))?;

        bytes
            .map(|bytes| UserProfile::try_from(bytes).map_err(|e| Error::Codec(e.to_string())))
            .transpose()
    }

    async fn save(&self, profile: UserProfile) -> Result<(), Error> {
        let user_id = profile.id.clone();
        let bytes: Bytes = profile
            .try_into()
            .map_err(|e: ciborium::ser::Error<std::io::Error>| Error::Codec(e.to_string()))?;

        self.users
            .put(user_id, bytes)
            .await
            .map_err(|e| Error::ProfileStore(e.to_string()))
    }

    async fn modify<F>(&self, user_id: &str, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut UserProfile) + Send,
    {
        let mut profile = self
            .load(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(user_id.to_string()))?;

        f(&mut profile);
        self.save(profile).await
    }
}

#[async_trait]
impl<S> ProfileManagement for ProfileManager<S>
where
    S: DocumentStore,
{
    type Store = S;

    fn new(ProfileManagerOptions { store }: ProfileManagerOptions<S>) -> Self {
        Self {
            users: store.collection(USERS_COLLECTION),
        }
    }

    async fn create_or_touch_profile(&self, identity: UserIdentity) -> Result<UserProfile, Error> {
        let user_id = identity.id.clone();
        let now = Utc::now();

        let existing = self.load(&user_id).await.map_err(|e| {
            error!(%user_id, "error creating/updating user profile: {e}");
            Error::CreateFailed
        })?;

        let profile = match existing {
            Some(mut profile) => {
                profile.last_login_at = now;
                debug!(%user_id, "touched existing profile");
                profile
            }
            None => {
                info!(%user_id, "creating profile on first sign-in");
                UserProfile::new(identity, now)
            }
        };

        self.save(profile.clone()).await.map_err(|e| {
            error!(%user_id, "error creating/updating user profile: {e}");
            Error::CreateFailed
        })?;

        Ok(profile)
    }

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, Error> {
        self.load(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(user_id.to_string()))
    }

    async fn set_xp(&self, user_id: &str, amount: u64) -> Result<(), Error> {
        self.modify(user_id, |profile| profile.xp = amount).await
    }

    async fn add_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), Error> {
        let event_id = event_id.to_string();
        self.modify(user_id, move |profile| {
            profile.registered_events.insert(event_id);
        })
        .await
    }

    async fn remove_registered_event(&self, user_id: &str, event_id: &str) -> Result<(), Error> {
        self.modify(user_id, |profile| {
            profile.registered_events.remove(event_id);
        })
        .await
    }
}
