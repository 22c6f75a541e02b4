use std::collections::BTreeSet;

use exp3_events::EventRecord;
use exp3_identity::UserIdentity;
use tracing::debug;

use crate::{CallToAction, Effect, Error, RegistrationConfig};

/// Registration progress of one event in the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationState {
    /// No registration in progress.
    NotRegistered,

    /// Waiting for the user to sign in.
    PendingAuth,

    /// Waiting for the user to confirm payment.
    PendingPayment,

    /// Registered in this session.
    Registered,
}

/// The modal currently showing. At most one is open at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Awaiting {
    /// Sign-in modal, optionally resuming an event afterwards.
    SignIn { pending: Option<usize> },

    /// Payment modal for an event.
    Payment { index: usize },
}

/// Outcome of the register decision table for one event.
enum Decision {
    OpenExternal(url::Url),
    AwaitAuth,
    AwaitPayment { title: String, price: u32 },
    OpenMeeting(url::Url),
    RegisterFree,
    Nothing,
}

/// Client-side registration state for the featured events of one page
/// session.
///
/// Events are addressed by their position in the catalog. Only one gated
/// registration is tracked at a time: triggering another while a modal is
/// open replaces both the pending event and the modal.
#[derive(Clone, Debug)]
pub struct RegistrationWorkflow {
    events: Vec<EventRecord>,
    config: RegistrationConfig,
    session: Option<UserIdentity>,
    registered: BTreeSet<usize>,
    awaiting: Option<Awaiting>,
}

impl RegistrationWorkflow {
    /// Creates a workflow over `events` with nobody signed in.
    #[must_use]
    pub const fn new(events: Vec<EventRecord>, config: RegistrationConfig) -> Self {
        Self {
            events,
            config,
            session: None,
            registered: BTreeSet::new(),
            awaiting: None,
        }
    }

    /// The events, in display order.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// The event at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if `index` is out of range.
    pub fn event(&self, index: usize) -> Result<&EventRecord, Error> {
        self.events.get(index).ok_or(Error::UnknownEvent(index))
    }

    /// Position of the event with the given ID.
    #[must_use]
    pub fn index_of(&self, event_id: &str) -> Option<usize> {
        self.events.iter().position(|event| event.id == event_id)
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&UserIdentity> {
        self.session.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The event currently waiting on sign-in or payment.
    #[must_use]
    pub const fn pending(&self) -> Option<usize> {
        match self.awaiting {
            Some(Awaiting::SignIn { pending }) => pending,
            Some(Awaiting::Payment { index }) => Some(index),
            None => None,
        }
    }

    /// Whether the sign-in modal is showing.
    #[must_use]
    pub const fn is_auth_open(&self) -> bool {
        matches!(self.awaiting, Some(Awaiting::SignIn { .. }))
    }

    /// Whether the payment modal is showing.
    #[must_use]
    pub const fn is_payment_open(&self) -> bool {
        matches!(self.awaiting, Some(Awaiting::Payment { .. }))
    }

    /// Whether the event at `index` is registered in this session.
    #[must_use]
    pub fn is_registered(&self, index: usize) -> bool {
        self.registered.contains(&index)
    }

    /// Installs the user resolved at startup, without touching any modal.
    pub fn restore_session(&mut self, user: Option<UserIdentity>) {
        self.session = user;
    }

    /// Marks an event registered without going through the gates, e.g. when
    /// the catalog already lists the user as an attendee.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if `index` is out of range.
    pub fn mark_registered(&mut self, index: usize) -> Result<(), Error> {
        self.event(index)?;
        self.registered.insert(index);
        Ok(())
    }

    /// Registration progress of the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if `index` is out of range.
    pub fn state(&self, index: usize) -> Result<RegistrationState, Error> {
        self.event(index)?;

        if self.registered.contains(&index) {
            return Ok(RegistrationState::Registered);
        }

        Ok(match self.awaiting {
            Some(Awaiting::Payment { index: pending }) if pending == index => {
                RegistrationState::PendingPayment
            }
            Some(Awaiting::SignIn {
                pending: Some(pending),
            }) if pending == index => RegistrationState::PendingAuth,
            _ => RegistrationState::NotRegistered,
        })
    }

    /// The register button for the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if `index` is out of range.
    pub fn call_to_action(&self, index: usize) -> Result<CallToAction, Error> {
        let event = self.event(index)?;
        let registered = self.registered.contains(&index);

        let action = if registered && event.meeting_link.is_some() {
            CallToAction::JoinMeeting
        } else if registered {
            CallToAction::Registered
        } else if let Some(link) = &event.external_link {
            CallToAction::RegisterExternal {
                host: link.host_str().unwrap_or_else(|| link.as_str()).to_string(),
            }
        } else if event.requires_auth && self.session.is_none() {
            CallToAction::ConnectToRegister
        } else {
            CallToAction::RegisterNow
        };

        Ok(action)
    }

    /// Handles a click on the card body (outside the register button).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if `index` is out of range.
    pub fn card_clicked(&self, index: usize) -> Result<Effect, Error> {
        let event = self.event(index)?;

        Ok(match &event.external_link {
            Some(url) => Effect::OpenExternal { url: url.clone() },
            None => Effect::ShowDetail {
                path: event.detail_path(),
            },
        })
    }

    /// Handles the register button of the event at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownEvent`] if `index` is out of range. State is
    /// unchanged in that case.
    pub fn register(&mut self, index: usize) -> Result<Effect, Error> {
        self.event(index)?;
        Ok(self.evaluate(index))
    }

    /// Opens the sign-in modal from the page header. An event already
    /// waiting on payment is resumed after signing in.
    pub fn open_sign_in(&mut self) {
        self.awaiting = Some(Awaiting::SignIn {
            pending: self.pending(),
        });
    }

    /// Sign-in finished: establishes the session, closes the sign-in modal
    /// and resumes the pending event, so payment gating still applies after
    /// signing in. Any other open modal is left as it is.
    pub fn auth_succeeded(&mut self, user: UserIdentity) -> Effect {
        debug!(user_id = %user.id, awaiting = ?self.awaiting, "sign-in succeeded");

        self.session = Some(user);

        let Some(Awaiting::SignIn { pending }) = self.awaiting else {
            return Effect::None;
        };
        self.awaiting = None;

        match pending {
            Some(index) => self.evaluate(index),
            None => Effect::None,
        }
    }

    /// The sign-in modal was dismissed.
    pub fn auth_cancelled(&mut self) {
        if self.is_auth_open() {
            debug!(awaiting = ?self.awaiting, "sign-in cancelled");
            self.awaiting = None;
        }
    }

    /// Payment was confirmed for the event in the payment modal.
    pub fn payment_succeeded(&mut self) -> Effect {
        let Some(Awaiting::Payment { index }) = self.awaiting else {
            return Effect::None;
        };

        debug!(index, "payment confirmed");

        self.awaiting = None;
        self.registered.insert(index);

        Effect::Registered { index }
    }

    /// The payment modal was dismissed.
    pub fn payment_cancelled(&mut self) {
        if self.is_payment_open() {
            debug!(awaiting = ?self.awaiting, "payment cancelled");
            self.awaiting = None;
        }
    }

    /// The user signed out. Session registrations are kept.
    pub fn signed_out(&mut self) {
        self.session = None;
    }

    fn decide(&self, index: usize) -> Decision {
        let event = &self.events[index];
        let registered = self.registered.contains(&index);

        if let Some(url) = &event.external_link {
            return Decision::OpenExternal(url.clone());
        }

        if event.requires_auth && self.session.is_none() {
            return Decision::AwaitAuth;
        }

        if event.is_paid() && !registered {
            return Decision::AwaitPayment {
                title: event.title.clone(),
                price: event.price.unwrap_or_default(),
            };
        }

        if let Some(url) = &event.meeting_link {
            if registered {
                return Decision::OpenMeeting(url.clone());
            }
        }

        if self.config.register_free_events && !registered {
            return Decision::RegisterFree;
        }

        Decision::Nothing
    }

    fn evaluate(&mut self, index: usize) -> Effect {
        match self.decide(index) {
            Decision::OpenExternal(url) => Effect::OpenExternal { url },
            Decision::AwaitAuth => {
                debug!(index, "registration waiting on sign-in");
                self.awaiting = Some(Awaiting::SignIn {
                    pending: Some(index),
                });
                Effect::PresentAuth { index }
            }
            Decision::AwaitPayment { title, price } => {
                debug!(index, price, "registration waiting on payment");
                self.awaiting = Some(Awaiting::Payment { index });
                Effect::PresentPayment {
                    index,
                    title,
                    price,
                }
            }
            Decision::OpenMeeting(url) => Effect::OpenMeeting { url },
            Decision::RegisterFree => {
                debug!(index, "registered free event");
                self.registered.insert(index);
                Effect::Registered { index }
            }
            Decision::Nothing => Effect::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Utc;
    use exp3_events::{EventStatus, NewEvent};
    use url::Url;

    fn event(id: &str, configure: impl FnOnce(&mut NewEvent)) -> EventRecord {
        let mut new_event = NewEvent {
            title: id.to_string(),
            attendee_limit: 10,
            status: EventStatus::Published,
            ..NewEvent::default()
        };
        configure(&mut new_event);
        new_event.into_record(id.to_string(), Utc::now())
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn workflow(events: Vec<EventRecord>) -> RegistrationWorkflow {
        RegistrationWorkflow::new(events, RegistrationConfig::default())
    }

    #[test]
    fn test_unknown_index() {
        let mut workflow = workflow(vec![]);

        assert_eq!(workflow.register(0), Err(Error::UnknownEvent(0)));
        assert_eq!(workflow.state(3), Err(Error::UnknownEvent(3)));
        assert_eq!(workflow.call_to_action(1), Err(Error::UnknownEvent(1)));
        assert_eq!(workflow.pending(), None);
    }

    #[test]
    fn test_free_event_is_a_no_op_by_default() {
        let mut workflow = workflow(vec![event("free", |_| {})]);

        assert_eq!(workflow.register(0), Ok(Effect::None));
        assert_eq!(workflow.state(0), Ok(RegistrationState::NotRegistered));
    }

    #[test]
    fn test_free_event_registers_when_configured() {
        let mut workflow = RegistrationWorkflow::new(
            vec![event("free", |_| {})],
            RegistrationConfig {
                register_free_events: true,
            },
        );

        assert_eq!(workflow.register(0), Ok(Effect::Registered { index: 0 }));
        assert_eq!(workflow.state(0), Ok(RegistrationState::Registered));
        assert_eq!(workflow.register(0), Ok(Effect::None));
    }

    #[test]
    fn test_zero_price_is_free() {
        let mut workflow = workflow(vec![event("zero", |e| e.price = Some(0))]);

        assert_eq!(workflow.register(0), Ok(Effect::None));
        assert!(!workflow.is_payment_open());
    }

    #[test]
    fn test_auth_required_free_event_after_sign_in() {
        let mut workflow = workflow(vec![event("members", |e| e.requires_auth = true)]);

        assert_eq!(workflow.register(0), Ok(Effect::PresentAuth { index: 0 }));
        assert_eq!(
            workflow.auth_succeeded(UserIdentity::new("ada")),
            Effect::None
        );
        assert_eq!(workflow.pending(), None);
        assert!(!workflow.is_auth_open());
    }

    #[test]
    fn test_priced_event_without_auth_goes_straight_to_payment() {
        let mut workflow = workflow(vec![event("paid", |e| e.price = Some(40))]);

        assert_eq!(
            workflow.register(0),
            Ok(Effect::PresentPayment {
                index: 0,
                title: "paid".to_string(),
                price: 40,
            })
        );
        assert_eq!(workflow.state(0), Ok(RegistrationState::PendingPayment));
    }

    #[test]
    fn test_auth_cancel_clears_pending() {
        let mut workflow = workflow(vec![event("gated", |e| {
            e.requires_auth = true;
            e.price = Some(100);
        })]);

        workflow.register(0).unwrap();
        workflow.auth_cancelled();

        assert_eq!(workflow.pending(), None);
        assert!(!workflow.is_auth_open());
        assert_eq!(workflow.state(0), Ok(RegistrationState::NotRegistered));
        assert!(!workflow.is_authenticated());
    }

    #[test]
    fn test_payment_cancel_clears_pending() {
        let mut workflow = workflow(vec![event("paid", |e| e.price = Some(10))]);

        workflow.register(0).unwrap();
        workflow.payment_cancelled();

        assert_eq!(workflow.pending(), None);
        assert!(!workflow.is_payment_open());
        assert!(!workflow.is_registered(0));
    }

    #[test]
    fn test_payment_without_pending_does_nothing() {
        let mut workflow = workflow(vec![event("paid", |e| e.price = Some(10))]);

        assert_eq!(workflow.payment_succeeded(), Effect::None);
        assert!(!workflow.is_registered(0));
    }

    #[test]
    fn test_header_sign_in_has_no_pending_event() {
        let mut workflow = workflow(vec![event("paid", |e| e.price = Some(10))]);

        workflow.open_sign_in();
        assert!(workflow.is_auth_open());
        assert_eq!(workflow.state(0), Ok(RegistrationState::NotRegistered));

        assert_eq!(
            workflow.auth_succeeded(UserIdentity::new("ada")),
            Effect::None
        );
        assert!(workflow.is_authenticated());
        assert!(!workflow.is_payment_open());
    }

    #[test]
    fn test_header_sign_in_over_payment_resumes_payment() {
        let mut workflow = workflow(vec![event("paid", |e| e.price = Some(10))]);

        workflow.register(0).unwrap();
        workflow.open_sign_in();
        assert!(!workflow.is_payment_open());
        assert_eq!(workflow.state(0), Ok(RegistrationState::PendingAuth));

        assert!(matches!(
            workflow.auth_succeeded(UserIdentity::new("ada")),
            Effect::PresentPayment { index: 0, .. }
        ));
    }

    #[test]
    fn test_sign_out_keeps_registrations() {
        let mut workflow = workflow(vec![event("paid", |e| e.price = Some(10))]);
        workflow.restore_session(Some(UserIdentity::new("ada")));

        workflow.register(0).unwrap();
        workflow.payment_succeeded();
        workflow.signed_out();

        assert!(!workflow.is_authenticated());
        assert!(workflow.is_registered(0));
    }

    #[test]
    fn test_call_to_action_table() {
        let mut workflow = workflow(vec![
            event("meeting", |e| {
                e.price = Some(5);
                e.meeting_link = Some(url("https://meet.example.com/room"));
            }),
            event("plain-paid", |e| e.price = Some(5)),
            event("external", |e| {
                e.external_link = Some(url("https://lu.ma/ux3"));
            }),
            event("gated", |e| e.requires_auth = true),
            event("open", |_| {}),
        ]);

        assert_eq!(workflow.call_to_action(0), Ok(CallToAction::RegisterNow));
        assert_eq!(
            workflow.call_to_action(2),
            Ok(CallToAction::RegisterExternal {
                host: "lu.ma".to_string()
            })
        );
        assert_eq!(
            workflow.call_to_action(3),
            Ok(CallToAction::ConnectToRegister)
        );
        assert_eq!(workflow.call_to_action(4), Ok(CallToAction::RegisterNow));

        workflow.mark_registered(0).unwrap();
        workflow.mark_registered(1).unwrap();
        workflow.restore_session(Some(UserIdentity::new("ada")));

        assert_eq!(workflow.call_to_action(0), Ok(CallToAction::JoinMeeting));
        assert_eq!(workflow.call_to_action(1), Ok(CallToAction::Registered));
        assert_eq!(workflow.call_to_action(3), Ok(CallToAction::RegisterNow));
    }

    #[test]
    fn test_registered_wins_over_external_link() {
        let mut workflow = workflow(vec![event("external", |e| {
            e.external_link = Some(url("https://lu.ma/ux3"));
        })]);
        workflow.mark_registered(0).unwrap();

        assert_eq!(workflow.call_to_action(0), Ok(CallToAction::Registered));
    }

    #[test]
    fn test_call_to_action_labels() {
        assert_eq!(CallToAction::JoinMeeting.to_string(), "Join Meeting");
        assert_eq!(CallToAction::Registered.to_string(), "Registered");
        assert_eq!(
            CallToAction::RegisterExternal {
                host: "lu.ma".to_string()
            }
            .to_string(),
            "Register on lu.ma"
        );
        assert_eq!(
            CallToAction::ConnectToRegister.to_string(),
            "Connect to Register"
        );
        assert_eq!(CallToAction::RegisterNow.to_string(), "Register Now");

        assert!(!CallToAction::Registered.is_enabled());
        assert!(CallToAction::JoinMeeting.is_enabled());
    }

    #[test]
    fn test_card_click() {
        let workflow = workflow(vec![
            event("ai-ux-workshop", |_| {}),
            event("ux-3toryu", |e| {
                e.external_link = Some(url("https://lu.ma/ux3"));
            }),
        ]);

        assert_eq!(
            workflow.card_clicked(0),
            Ok(Effect::ShowDetail {
                path: "/events/ai-ux-workshop".to_string()
            })
        );
        assert_eq!(
            workflow.card_clicked(1),
            Ok(Effect::OpenExternal {
                url: url("https://lu.ma/ux3")
            })
        );
    }

    #[test]
    fn test_index_of() {
        let workflow = workflow(vec![event("a", |_| {}), event("b", |_| {})]);

        assert_eq!(workflow.index_of("b"), Some(1));
        assert_eq!(workflow.index_of("c"), None);
    }
}
