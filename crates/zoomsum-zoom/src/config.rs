//! Zoom provider configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ZoomError, ZoomResult};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.zoom.us/v2";

/// Default token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://zoom.us/oauth/token";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default page size for list endpoints. Zoom caps this at 300.
pub const DEFAULT_PAGE_SIZE: u32 = 300;

/// Server-to-server OAuth app credentials.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoomCredentials {
    /// The account id of the server-to-server app.
    pub account_id: String,
    /// The app client id.
    pub client_id: String,
    /// The app client secret.
    pub client_secret: String,
}

impl ZoomCredentials {
    /// Creates credentials from the three app values.
    pub fn new(
        account_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Checks that no credential value is empty.
    pub fn validate(&self) -> ZoomResult<()> {
        for (name, value) in [
            ("account_id", &self.account_id),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(ZoomError::configuration(format!("{} is empty", name)));
            }
        }
        Ok(())
    }
}

/// Configuration for the Zoom provider.
#[derive(Debug, Clone)]
pub struct ZoomConfig {
    /// App credentials.
    pub credentials: ZoomCredentials,
    /// The user whose meetings are listed. `me` resolves to the app owner.
    pub user: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// API base URL, overridable for tests.
    pub api_base: String,
    /// Token endpoint URL, overridable for tests.
    pub token_url: String,
    /// Page size for list endpoints.
    pub page_size: u32,
    /// Optional path for the on-disk token cache.
    pub token_cache_path: Option<PathBuf>,
}

impl ZoomConfig {
    /// Creates a config with defaults for everything but the credentials.
    pub fn new(credentials: ZoomCredentials) -> Self {
        Self {
            credentials,
            user: "me".to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_base: DEFAULT_API_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            token_cache_path: None,
        }
    }

    /// Sets the user whose meetings are listed.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Overrides the token endpoint URL.
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Sets the on-disk token cache path.
    #[must_use]
    pub fn with_token_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache_path = Some(path.into());
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ZoomResult<()> {
        self.credentials.validate()?;
        if self.user.trim().is_empty() {
            return Err(ZoomError::configuration("user is empty"));
        }
        if self.page_size == 0 {
            return Err(ZoomError::configuration("page_size must be positive"));
        }
        Ok(())
    }
}
