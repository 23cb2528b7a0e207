//! Server-to-server OAuth token exchange.
//!
//! Zoom server-to-server apps obtain access tokens by POSTing to the token
//! endpoint with `grant_type=account_credentials`, the account id, and an
//! HTTP basic-auth header of `client_id:client_secret`. A single attempt is
//! made per call; retry decisions belong to the caller.

use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use tracing::{debug, info};

use crate::client::transport_error;
use crate::config::{ZoomConfig, ZoomCredentials};
use crate::error::{ZoomError, ZoomResult};
use crate::tokens::AccessToken;

/// Boxed future used by [`TokenSource`] implementations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can produce a fresh access token.
///
/// The token cache is generic over this so tests can substitute a counting
/// fake for the real [`Authenticator`].
pub trait TokenSource: Send + Sync {
    /// Obtains a fresh access token. One attempt, no retries.
    fn fetch_token(&self) -> BoxFuture<'_, ZoomResult<AccessToken>>;
}

/// Exchanges server-to-server app credentials for access tokens.
#[derive(Debug)]
pub struct Authenticator {
    credentials: ZoomCredentials,
    token_url: String,
    http_client: reqwest::Client,
}

impl Authenticator {
    /// Creates an authenticator from the provider configuration.
    pub fn new(config: &ZoomConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Self {
            credentials: config.credentials.clone(),
            token_url: config.token_url.clone(),
            http_client,
        }
    }

    /// Performs the token exchange and returns the new access token.
    ///
    /// # Errors
    ///
    /// Fails with an authentication error when the endpoint rejects the
    /// exchange or the response lacks the expected fields, and with a
    /// network error when the request itself fails.
    pub async fn authenticate(&self) -> ZoomResult<AccessToken> {
        debug!(
            "requesting access token for account {}",
            self.credentials.account_id
        );

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .query(&[
                ("grant_type", "account_credentials"),
                ("account_id", self.credentials.account_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e).with_endpoint(self.token_url.clone()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ZoomError::authentication(format!(
                "token exchange failed ({}): {}",
                status,
                body.trim()
            ))
            .with_endpoint(self.token_url.clone()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e).with_endpoint(self.token_url.clone()))?;

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ZoomError::authentication(format!("token response missing expected fields: {}", e))
                .with_endpoint(self.token_url.clone())
        })?;

        if token.access_token.is_empty() {
            return Err(ZoomError::authentication("token response has empty access_token")
                .with_endpoint(self.token_url.clone()));
        }

        info!("obtained access token, expires in {}s", token.expires_in);
        Ok(AccessToken::new(token.access_token, token.expires_in))
    }
}

impl TokenSource for Authenticator {
    fn fetch_token(&self) -> BoxFuture<'_, ZoomResult<AccessToken>> {
        Box::pin(self.authenticate())
    }
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[allow(dead_code)]
    token_type: Option<String>,
}
