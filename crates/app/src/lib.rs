//! The EXP3 events application: wires the catalog, profiles, sessions and
//! the registration workflow into one object that a front end drives.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod error;
mod featured;

pub use config::AppConfig;
pub use error::Error;
pub use featured::{featured_events, seed_featured_events};

use exp3_events::{
    Error as EventsError, EventFilter, EventManagement, EventManager, EventManagerOptions,
    EventRecord,
};
use exp3_identity::{IdentityProvider, UserIdentity};
use exp3_origins::OriginAuthorizer;
use exp3_profiles::{Error as ProfileError, ProfileManagement, UserProfile};
use exp3_registration::{CallToAction, Effect, RegistrationState, RegistrationWorkflow};
use exp3_sessions::{SessionManagement, SessionManager, SessionManagerOptions, SignInOutcome};
use exp3_store::DocumentStore;
use tracing::{debug, info, warn};

/// Where a sign-in attempt ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignInProgress {
    /// Signed in. Carries what the resumed registration asks the UI to do.
    Completed(Effect),

    /// A redirect sign-in was started. It completes on the next
    /// [`App::start`].
    Redirecting,
}

/// Options for creating a new `App`.
pub struct AppOptions<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    /// Application configuration.
    pub config: AppConfig,

    /// The identity provider.
    pub identity_provider: P,

    /// The document store backing events and profiles.
    pub store: S,
}

/// The application.
///
/// Store writes for a registration happen before the workflow transitions,
/// so a failed write leaves the workflow where it was.
#[derive(Debug)]
pub struct App<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    config: AppConfig,
    events: EventManager<S>,
    sessions: SessionManager<P, S>,
    workflow: RegistrationWorkflow,
}

impl<P, S> App<P, S>
where
    P: IdentityProvider,
    S: DocumentStore,
{
    /// Creates a new application. Call [`Self::start`] before use.
    pub fn new(
        AppOptions {
            config,
            identity_provider,
            store,
        }: AppOptions<P, S>,
    ) -> Self {
        let sessions = SessionManager::new(SessionManagerOptions {
            authorizer: OriginAuthorizer::from_config(&config.origins),
            identity_provider,
            store: store.clone(),
        });

        let events = EventManager::new(EventManagerOptions { store });
        let workflow = RegistrationWorkflow::new(Vec::new(), config.registration.clone());

        Self {
            config,
            events,
            sessions,
            workflow,
        }
    }

    /// Seeds the catalog if configured, restores the signed-in user (first
    /// collecting any redirect sign-in), and loads the published events.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be seeded or read.
    pub async fn start(&mut self) -> Result<(), Error> {
        if self.config.seed_featured_events {
            seed_featured_events(&self.events).await?;
        }

        let user = match self.sessions.complete_redirect().await {
            Ok(Some(profile)) => Some(profile.identity()),
            Ok(None) => self.sessions.current_user().await,
            Err(e) => {
                warn!("redirect sign-in failed: {e}");
                self.sessions.current_user().await
            }
        };

        let events = self
            .events
            .list_events(Some(&EventFilter::published()))
            .await?;
        info!(count = events.len(), "loaded events");

        let mut workflow = RegistrationWorkflow::new(events, self.config.registration.clone());

        if let Some(user) = &user {
            let registered: Vec<String> = workflow
                .events()
                .iter()
                .filter(|event| event.is_registered(&user.id))
                .map(|event| event.id.clone())
                .collect();
            sync_registrations(&mut workflow, registered)?;
        }

        workflow.restore_session(user);
        self.workflow = workflow;

        Ok(())
    }

    /// The application configuration.
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The registration workflow, for rendering.
    pub const fn workflow(&self) -> &RegistrationWorkflow {
        &self.workflow
    }

    /// The signed-in user, if any.
    pub const fn current_user(&self) -> Option<&UserIdentity> {
        self.workflow.session()
    }

    /// The loaded events, in display order.
    pub fn events(&self) -> &[EventRecord] {
        self.workflow.events()
    }

    /// The register button of the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn call_to_action(&self, index: usize) -> Result<CallToAction, Error> {
        Ok(self.workflow.call_to_action(index)?)
    }

    /// Registration progress of the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn registration_state(&self, index: usize) -> Result<RegistrationState, Error> {
        Ok(self.workflow.state(index)?)
    }

    /// Handles a click on the card of the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn card_clicked(&self, index: usize) -> Result<Effect, Error> {
        Ok(self.workflow.card_clicked(index)?)
    }

    /// Handles the register button of the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or a registration cannot
    /// be recorded.
    pub async fn register(&mut self, index: usize) -> Result<Effect, Error> {
        let mut next = self.workflow.clone();
        let effect = next.register(index)?;

        self.commit(next, effect).await
    }

    /// Opens the sign-in modal from the page header.
    pub fn open_sign_in(&mut self) {
        self.workflow.open_sign_in();
    }

    /// Signs in from the sign-in modal and resumes the pending registration.
    /// The modal must be open, either from a gated register press or from
    /// [`Self::open_sign_in`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignInNotOpen`] if the modal is closed. Otherwise
    /// returns the sign-in failure; the modal stays open and nothing else
    /// changes.
    pub async fn sign_in(&mut self) -> Result<SignInProgress, Error> {
        if !self.workflow.is_auth_open() {
            return Err(Error::SignInNotOpen);
        }

        let outcome = self.sessions.sign_in(&self.config.origin_host).await?;

        let profile = match outcome {
            SignInOutcome::SignedIn(profile) => profile,
            SignInOutcome::Redirecting => return Ok(SignInProgress::Redirecting),
        };

        let mut next = self.workflow.clone();
        sync_registrations(&mut next, profile.registered_events.iter().cloned())?;
        let effect = next.auth_succeeded(profile.identity());

        Ok(SignInProgress::Completed(self.commit(next, effect).await?))
    }

    /// Dismisses the sign-in modal.
    pub fn cancel_sign_in(&mut self) {
        self.workflow.auth_cancelled();
    }

    /// Confirms payment for the pending event.
    ///
    /// # Errors
    ///
    /// Returns an error if the registration cannot be recorded. The payment
    /// modal stays open in that case.
    pub async fn confirm_payment(&mut self) -> Result<Effect, Error> {
        let mut next = self.workflow.clone();
        let effect = next.payment_succeeded();

        self.commit(next, effect).await
    }

    /// Dismisses the payment modal.
    pub fn cancel_payment(&mut self) {
        self.workflow.payment_cancelled();
    }

    /// Signs the user out. Registrations made in this session stay marked.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity provider fails to sign out.
    pub async fn sign_out(&mut self) -> Result<(), Error> {
        self.sessions.sign_out().await?;
        self.workflow.signed_out();

        Ok(())
    }

    /// Fetches an event for its detail page.
    ///
    /// # Errors
    ///
    /// Returns "Event not found" for unknown IDs.
    pub async fn event_detail(&self, event_id: &str) -> Result<EventRecord, Error> {
        Ok(self.events.get_event(event_id).await?)
    }

    /// Events the signed-in user is registered for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] without a session.
    pub async fn my_events(&self) -> Result<Vec<EventRecord>, Error> {
        let user = self.current_user().ok_or(Error::NotSignedIn)?;

        Ok(self.events.list_events_for_user(&user.id).await?)
    }

    /// The signed-in user's stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSignedIn`] without a session, or "User not found"
    /// if the user has no profile.
    pub async fn profile(&self) -> Result<UserProfile, Error> {
        let user = self.current_user().ok_or(Error::NotSignedIn)?;

        Ok(self.sessions.profiles().get_profile(&user.id).await?)
    }

    async fn commit(&mut self, next: RegistrationWorkflow, effect: Effect) -> Result<Effect, Error> {
        if let Effect::Registered { index } = effect {
            self.record_registration(&next, index).await?;
        }

        self.workflow = next;
        Ok(effect)
    }

    async fn record_registration(
        &self,
        workflow: &RegistrationWorkflow,
        index: usize,
    ) -> Result<(), Error> {
        let event_id = &workflow.event(index)?.id;

        let Some(user) = workflow.session() else {
            debug!(%event_id, "registered without a session, nothing to record");
            return Ok(());
        };

        match self.events.register_user(event_id, &user.id).await {
            Ok(()) | Err(EventsError::AlreadyRegistered) => {}
            Err(e) => {
                warn!(%event_id, user_id = %user.id, "registration rejected: {e}");
                return Err(e.into());
            }
        }

        match self
            .sessions
            .profiles()
            .add_registered_event(&user.id, event_id)
            .await
        {
            Ok(()) => {}
            Err(ProfileError::NotFound(user_id)) => {
                warn!(%user_id, %event_id, "no profile to record the registration on");
            }
            Err(e) => return Err(e.into()),
        }

        info!(%event_id, user_id = %user.id, "recorded registration");
        Ok(())
    }
}

fn sync_registrations<I>(workflow: &mut RegistrationWorkflow, event_ids: I) -> Result<(), Error>
where
    I: IntoIterator<Item = String>,
{
    for event_id in event_ids {
        if let Some(index) = workflow.index_of(&event_id) {
            workflow.mark_registered(index)?;
        }
    }

    Ok(())
}
