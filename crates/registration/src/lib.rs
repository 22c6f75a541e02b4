//! Client-side registration workflow: decides what each event's register
//! button shows and does, and walks gated events through sign-in and
//! payment.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod action;
mod config;
mod effect;
mod error;
mod workflow;

pub use action::CallToAction;
pub use config::RegistrationConfig;
pub use effect::Effect;
pub use error::Error;
pub use workflow::{RegistrationState, RegistrationWorkflow};
