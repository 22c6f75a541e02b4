//! Decides which browser origins may complete federated sign-in.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::Error;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Hosts allowed to complete sign-in when no configuration is supplied.
pub const DEFAULT_ALLOWED_HOSTS: &[&str] = &[
    "github-ifz6r7.bolt.new",
    "stackblitz.io",
    "bolt.new",
    "exp32024.firebaseapp.com",
    "exp32024.web.app",
    "localhost",
    "localhost:5173",
    "localhost:3000",
    "githubifz6r7-ipmo-kr6v54ci--5173--d3acb9e1.local-credentialless.webcontainer.io",
    "stackblitz.com",
    "webcontainer.io",
    "local-credentialless.webcontainer.io",
];

/// Substrings that authorize a host on their own, whatever the allow-list
/// holds. These match anywhere in the host, so
/// `evil-webcontainer.io.attacker.com` is authorized too.
const SANDBOX_HOST_MARKERS: &[&str] = &["webcontainer.io", "stackblitz.com", "stackblitz.io"];

const LOCALHOST_MARKER: &str = "localhost";

/// Allow-list configuration.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct OriginsConfig {
    /// Hosts (optionally with port) permitted to sign in, including their
    /// subdomains.
    pub allowed_hosts: Vec<String>,
}

impl Default for OriginsConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: DEFAULT_ALLOWED_HOSTS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Pure predicate over an origin host and a fixed allow-list.
#[derive(Clone, Debug)]
pub struct OriginAuthorizer {
    allowed_hosts: Vec<String>,
}

impl OriginAuthorizer {
    /// Creates an authorizer over the given allow-list.
    pub fn new<I, S>(allowed_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_hosts: allowed_hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates an authorizer from configuration.
    #[must_use]
    pub fn from_config(config: &OriginsConfig) -> Self {
        Self::new(config.allowed_hosts.iter().cloned())
    }

    /// The allow-list this authorizer checks against.
    #[must_use]
    pub fn allowed_hosts(&self) -> &[String] {
        &self.allowed_hosts
    }

    /// Returns true if `origin_host` may complete federated sign-in.
    #[must_use]
    pub fn is_authorized(&self, origin_host: &str) -> bool {
        let authorized = Self::is_sandbox_host(origin_host)
            || self
                .allowed_hosts
                .iter()
                .any(|entry| Self::matches_entry(origin_host, entry));

        debug!(origin_host, authorized, "checked origin against allow-list");

        authorized
    }

    /// Same as [`Self::is_authorized`], taking a full origin such as
    /// `https://app.bolt.new`.
    ///
    /// # Errors
    ///
    /// Returns an error if the origin does not parse or has no host.
    pub fn is_origin_authorized(&self, origin: &str) -> Result<bool, Error> {
        let url = Url::parse(origin).map_err(|e| Error::InvalidOrigin(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| Error::MissingHost(origin.to_string()))?;

        Ok(self.is_authorized(host))
    }

    fn is_sandbox_host(origin_host: &str) -> bool {
        SANDBOX_HOST_MARKERS
            .iter()
            .any(|marker| origin_host.contains(marker))
    }

    fn matches_entry(origin_host: &str, entry: &str) -> bool {
        origin_host == entry
            || origin_host
                .strip_suffix(entry)
                .is_some_and(|rest| rest.ends_with('.'))
            || (origin_host.contains(LOCALHOST_MARKER) && entry.contains(LOCALHOST_MARKER))
    }
}

impl Default for OriginAuthorizer {
    fn default() -> Self {
        Self::from_config(&OriginsConfig::default())
    }
}
