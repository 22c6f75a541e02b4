//! Session management: resolves the signed-in user, signs in through the
//! identity provider, and keeps the user's profile in step.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use async_trait::async_trait;
use exp3_identity::{IdentityProvider, UserIdentity};
use exp3_origins::OriginAuthorizer;
use exp3_profiles::{ProfileManagement, ProfileManager, ProfileManagerOptions, UserProfile};
use exp3_store::DocumentStore;
use tracing::{debug, info, warn};

/// Result of a sign-in attempt that did not fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInOutcome {
    /// The user is signed in and their profile is up to date.
    SignedIn(UserProfile),

    /// The popup flow was unavailable and a redirect sign-in was started.
    /// The result arrives through `complete_redirect` after the page loads
    /// again.
    Redirecting,
}

/// Options for creating a new `SessionManager`.
pub struct SessionManagerOptions<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    /// Allow-list for the origins that may sign in.
    pub authorizer: OriginAuthorizer,

    /// The identity provider.
    pub identity_provider: P,

    /// The document store holding user profiles.
    pub store: S,
}

/// Trait for managing the signed-in session.
#[async_trait]
pub trait SessionManagement
where
    Self: Clone + Send + Sync + 'static,
{
    /// Identity provider type.
    type IdentityProvider: IdentityProvider;

    /// Document store type.
    type Store: DocumentStore;

    /// Creates a new instance of the session manager.
    fn new(options: SessionManagerOptions<Self::IdentityProvider, Self::Store>) -> Self;

    /// Resolves the signed-in user at startup. The stored profile wins over
    /// the provider's view of the user when it exists.
    async fn current_user(&self) -> Option<UserIdentity>;

    /// Signs in from a page served on `origin_host`.
    ///
    /// A blocked popup or an unauthorized-domain answer from the provider
    /// falls back once to a redirect sign-in.
    async fn sign_in(&self, origin_host: &str) -> Result<SignInOutcome, Error>;

    /// Collects a redirect sign-in started by an earlier `sign_in`.
    async fn complete_redirect(&self) -> Result<Option<UserProfile>, Error>;

    /// Signs the user out.
    async fn sign_out(&self) -> Result<(), Error>;
}

/// Manages the signed-in session.
#[derive(Clone, Debug)]
pub struct SessionManager<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    authorizer: OriginAuthorizer,
    identity_provider: P,
    profiles: ProfileManager<S>,
}

impl<P, S> SessionManager<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    /// The profile manager sharing this session's store.
    pub const fn profiles(&self) -> &ProfileManager<S> {
        &self.profiles
    }
}

#[async_trait]
impl<P, S> SessionManagement for SessionManager<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    type IdentityProvider = P;
    type Store = S;

    fn new(
        SessionManagerOptions {
            authorizer,
            identity_provider,
            store,
        }: SessionManagerOptions<P, S>,
    ) -> Self {
        Self {
            authorizer,
            identity_provider,
            profiles: ProfileManager::new(ProfileManagerOptions { store }),
        }
    }

    async fn current_user(&self) -> Option<UserIdentity> {
        let user = self.identity_provider.current_user().await?;

        match self.profiles.get_profile(&user.id).await {
            Ok(profile) => Some(profile.identity()),
            Err(e) => {
                debug!(user_id = %user.id, "no stored profile, using provider identity: {e}");
                Some(user)
            }
        }
    }

    async fn sign_in(&self, origin_host: &str) -> Result<SignInOutcome, Error> {
        if !self.authorizer.is_authorized(origin_host) {
            warn!(origin_host, "sign-in attempted from unauthorized origin");
            return Err(Error::UnauthorizedOrigin(origin_host.to_string()));
        }

        let identity = match self.identity_provider.sign_in_with_popup().await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Err(Error::NoUserData),
            Err(e) if e.should_fall_back_to_redirect() => {
                info!(origin_host, "popup sign-in unavailable ({e}), falling back to redirect");
                self.identity_provider.sign_in_with_redirect().await?;
                return Ok(SignInOutcome::Redirecting);
            }
            Err(e) => {
                warn!(origin_host, "popup sign-in failed: {e}");
                return Err(Error::Auth(e));
            }
        };

        let profile = self.profiles.create_or_touch_profile(identity).await?;
        info!(user_id = %profile.id, "signed in");

        Ok(SignInOutcome::SignedIn(profile))
    }

    async fn complete_redirect(&self) -> Result<Option<UserProfile>, Error> {
        let Some(identity) = self.identity_provider.redirect_result().await? else {
            return Ok(None);
        };

        let profile = self.profiles.create_or_touch_profile(identity).await?;
        info!(user_id = %profile.id, "signed in via redirect");

        Ok(Some(profile))
    }

    async fn sign_out(&self) -> Result<(), Error> {
        self.identity_provider.sign_out().await.map_err(|e| {
            warn!("sign-out failed: {e}");
            Error::SignOut(e)
        })?;

        info!("signed out");
        Ok(())
    }
}
