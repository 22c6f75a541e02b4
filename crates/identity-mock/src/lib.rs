//! A mock implementation of the identity provider.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use exp3_identity::{AuthError, IdentityProvider, UserIdentity};
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default)]
struct MockState {
    current_user: Option<UserIdentity>,
    default_user: Option<UserIdentity>,
    popup_results: VecDeque<Result<Option<UserIdentity>, AuthError>>,
    redirect_user: Option<UserIdentity>,
    redirect_error: Option<AuthError>,
    redirect_started: bool,
    redirect_requests: usize,
    popup_requests: usize,
    sign_out_error: Option<AuthError>,
}

/// A mock implementation of the `IdentityProvider` trait. Used for testing
/// and local development.
///
/// Popup sign-ins consume queued results first; once the queue is empty the
/// default user (if any) signs in.
#[derive(Clone, Debug, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockIdentityProvider {
    /// Creates a new instance of `MockIdentityProvider` with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider where every popup sign-in succeeds as `user`.
    #[must_use]
    pub fn with_default_user(user: UserIdentity) -> Self {
        let state = MockState {
            default_user: Some(user),
            ..MockState::default()
        };

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Marks `user` as already signed in, as if restored from a prior visit.
    pub async fn set_current_user(&self, user: Option<UserIdentity>) {
        self.state.lock().await.current_user = user;
    }

    /// Queues the outcome of the next popup sign-in.
    pub async fn push_popup_result(&self, result: Result<Option<UserIdentity>, AuthError>) {
        self.state.lock().await.popup_results.push_back(result);
    }

    /// Sets the user returned once a redirect sign-in completes.
    pub async fn set_redirect_user(&self, user: UserIdentity) {
        self.state.lock().await.redirect_user = Some(user);
    }

    /// Makes the next redirect result fail with `error`.
    pub async fn fail_redirect(&self, error: AuthError) {
        self.state.lock().await.redirect_error = Some(error);
    }

    /// Makes the next sign-out fail with `error`.
    pub async fn fail_sign_out(&self, error: AuthError) {
        self.state.lock().await.sign_out_error = Some(error);
    }

    /// Number of popup sign-ins attempted.
    pub async fn popup_requests(&self) -> usize {
        self.state.lock().await.popup_requests
    }

    /// Number of redirect sign-ins started.
    pub async fn redirect_requests(&self) -> usize {
        self.state.lock().await.redirect_requests
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn current_user(&self) -> Option<UserIdentity> {
        self.state.lock().await.current_user.clone()
    }

    async fn sign_in_with_popup(&self) -> Result<Option<UserIdentity>, AuthError> {
        let mut state = self.state.lock().await;
        state.popup_requests += 1;

        let result = match state.popup_results.pop_front() {
            Some(result) => result,
            None => Ok(state.default_user.clone()),
        };

        if let Ok(Some(user)) = &result {
            debug!(user_id = %user.id, "mock popup sign-in succeeded");
            state.current_user = Some(user.clone());
        }

        result
    }

    async fn sign_in_with_redirect(&self) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;
        state.redirect_requests += 1;
        state.redirect_started = true;
        Ok(())
    }

    async fn redirect_result(&self) -> Result<Option<UserIdentity>, AuthError> {
        let mut state = self.state.lock().await;

        if let Some(error) = state.redirect_error.take() {
            return Err(error);
        }

        if !state.redirect_started {
            return Ok(None);
        }

        state.redirect_started = false;
        let user = state.redirect_user.take().or_else(|| state.default_user.clone());
        if let Some(user) = &user {
            state.current_user = Some(user.clone());
        }

        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut state = self.state.lock().await;

        if let Some(error) = state.sign_out_error.take() {
            return Err(error);
        }

        state.current_user = None;
        Ok(())
    }
}
