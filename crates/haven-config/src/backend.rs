//! Hosted backend (auth + REST) configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default HTTP request timeout in seconds.
const fn default_request_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project URL (e.g., `https://abcd.supabase.co`).
    #[serde(default)]
    pub url: String,

    /// Public (anon) API key, sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,

    /// Elevated service credential. Only the admin API uses it; it must never
    /// reach a client.
    #[serde(default)]
    pub service_role_key: String,

    /// Per-request timeout for backend calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            service_role_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Check if the client-side fields are present.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    /// Check if privileged admin operations can be proxied.
    pub fn can_administer(&self) -> bool {
        self.is_configured() && !self.service_role_key.is_empty()
    }

    /// Project URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Fail with `NotConfigured` unless the client-side fields are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` for section `backend`.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        if self.is_configured() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "backend".into(),
            })
        }
    }
}
