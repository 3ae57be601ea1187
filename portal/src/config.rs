//! Portal client configuration loaded via OrthoConfig.

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::domain::ExpiryPolicy;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_FILE: &str = "portal-session.json";
const DEFAULT_EXPIRY_DELAY_MS: u64 = 3_000;

/// Settings for talking to the complaint backend and keeping a session.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Base URL of the backend API.
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Path of the JSON file holding the session.
    pub session_file: Option<String>,
    /// Pause before a failed dashboard load clears the session, in ms.
    pub expiry_delay_ms: Option<u64>,
    /// Whether non-authentication failures also clear the session.
    pub evict_on_transient: Option<bool>,
}

impl PortalSettings {
    /// Configured API base URL, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a URL.
    pub fn api_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
    }

    /// Request timeout, falling back to thirty seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Session file location, falling back to the working directory.
    pub fn session_file(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(
            self.session_file
                .as_deref()
                .unwrap_or(DEFAULT_SESSION_FILE),
        )
    }

    /// Expiry policy assembled from the delay and eviction settings.
    pub fn expiry_policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::new(
            Duration::from_millis(self.expiry_delay_ms.unwrap_or(DEFAULT_EXPIRY_DELAY_MS)),
            self.evict_on_transient.unwrap_or(true),
        )
    }
}
