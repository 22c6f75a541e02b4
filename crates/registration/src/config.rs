use serde::{Deserialize, Serialize};

/// Registration workflow configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Mark free events that need no further gating as registered when
    /// their register button is pressed. When false, such presses do
    /// nothing.
    pub register_free_events: bool,
}
