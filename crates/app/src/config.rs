use std::path::Path;

use exp3_origins::OriginsConfig;
use exp3_registration::RegistrationConfig;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Application configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Host the page is served from. Sign-in is only offered when this host
    /// passes the origin allow-list.
    pub origin_host: String,

    /// Sign-in origin allow-list.
    pub origins: OriginsConfig,

    /// Registration workflow settings.
    pub registration: RegistrationConfig,

    /// Create the featured events in the catalog at startup if missing.
    pub seed_featured_events: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin_host: "localhost".to_string(),
            origins: OriginsConfig::default(),
            registration: RegistrationConfig::default(),
            seed_featured_events: true,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file. Missing keys take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("Failed to read config file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {e}")))
    }
}
