//! Configuration for the PEP client.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use pep_sdk::{PdpClientError, PolicyStore};
use serde::{Deserialize, Serialize};

use crate::domain::RequestDefaults;

/// Prefix of environment variables overriding the configuration.
///
/// Nested keys are separated by `__`, e.g.
/// `PERMGUARD_PDP_DEFAULT_POLICY_STORE__ID`.
pub const ENV_PREFIX: &str = "PERMGUARD_PDP_";

/// Connection settings and request defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PdpClientConfig {
    /// PDP host name or address.
    pub host: String,
    pub port: u16,
    /// Connect over `http` instead of `https`.
    pub use_plaintext: bool,
    /// Policy store used when a request does not set one.
    pub default_policy_store: Option<PolicyStore>,
    /// Zone id used when a request leaves it at `0`.
    pub default_zone_id: i64,
}

impl Default for PdpClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 9094,
            use_plaintext: true,
            default_policy_store: None,
            default_zone_id: 0,
        }
    }
}

impl PdpClientConfig {
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_plaintext(mut self, use_plaintext: bool) -> Self {
        self.use_plaintext = use_plaintext;
        self
    }

    #[must_use]
    pub fn with_default_policy_store(mut self, policy_store: PolicyStore) -> Self {
        self.default_policy_store = Some(policy_store);
        self
    }

    #[must_use]
    pub fn with_default_zone_id(mut self, zone_id: i64) -> Self {
        self.default_zone_id = zone_id;
        self
    }

    /// `http://host:port` or `https://host:port`.
    #[must_use]
    pub fn endpoint_uri(&self) -> String {
        let scheme = if self.use_plaintext { "http" } else { "https" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_defaults(&self) -> RequestDefaults {
        RequestDefaults {
            policy_store: self.default_policy_store.clone(),
            zone_id: self.default_zone_id,
        }
    }

    /// Layered sources: defaults, then the YAML file (if given and present),
    /// then `PERMGUARD_PDP_*` environment variables.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load from [`PdpClientConfig::figment`].
    ///
    /// # Errors
    ///
    /// [`PdpClientError::Configuration`] if a source is malformed or carries
    /// unknown keys.
    pub fn load(path: Option<&Path>) -> Result<Self, PdpClientError> {
        Self::figment(path).extract().map_err(|e| {
            tracing::error!(error = %e, "failed to load PDP client configuration");
            PdpClientError::configuration(e.to_string())
        })
    }
}
