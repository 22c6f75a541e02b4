//! Abstract interface for the federated identity provider.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod identity;

pub use error::AuthError;
pub use identity::UserIdentity;

use std::fmt::Debug;

use async_trait::async_trait;

/// A federated identity provider with popup and redirect sign-in flows.
#[async_trait]
pub trait IdentityProvider
where
    Self: Clone + Debug + Send + Sync + 'static,
{
    /// Resolves the currently signed-in user, if any.
    async fn current_user(&self) -> Option<UserIdentity>;

    /// Signs in through a popup window.
    ///
    /// `Ok(None)` means the provider finished without returning a user.
    async fn sign_in_with_popup(&self) -> Result<Option<UserIdentity>, AuthError>;

    /// Starts a redirect sign-in. The result is collected later with
    /// [`Self::redirect_result`].
    async fn sign_in_with_redirect(&self) -> Result<(), AuthError>;

    /// Collects the result of a previously started redirect sign-in.
    async fn redirect_result(&self) -> Result<Option<UserIdentity>, AuthError>;

    /// Signs the current user out.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
