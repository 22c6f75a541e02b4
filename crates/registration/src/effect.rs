use url::Url;

/// What the UI must do after a workflow transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Open an external registration page in a new browsing context with no
    /// opener or referrer.
    OpenExternal {
        /// Page to open.
        url: Url,
    },

    /// Open the meeting of an event the user is registered for in a new
    /// browsing context.
    OpenMeeting {
        /// Meeting to open.
        url: Url,
    },

    /// Show the sign-in modal.
    PresentAuth {
        /// The event waiting on sign-in.
        index: usize,
    },

    /// Show the payment modal.
    PresentPayment {
        /// The event waiting on payment.
        index: usize,

        /// Event title for the modal.
        title: String,

        /// Amount due, in EX3 credits.
        price: u32,
    },

    /// Navigate to an event's detail page.
    ShowDetail {
        /// Route of the detail page.
        path: String,
    },

    /// The event is now registered.
    Registered {
        /// The newly registered event.
        index: usize,
    },

    /// Nothing to do.
    None,
}
