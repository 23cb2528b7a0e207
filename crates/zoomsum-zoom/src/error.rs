//! Error types for Zoom API operations.

use std::fmt;
use thiserror::Error;

/// The category of a Zoom provider error.
///
/// This enum provides a high-level classification of errors for use in
/// exit-code decisions and retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoomErrorCode {
    /// Authentication failed - token exchange rejected or token invalid.
    AuthenticationFailed,
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// Rate limit exceeded - too many requests.
    RateLimited,
    /// Server returned an error (5xx status codes).
    ServerError,
    /// Invalid response from the server - parse error, missing fields.
    InvalidResponse,
    /// Resource not found (404).
    NotFound,
    /// Request was invalid (400) - bad parameters, malformed request.
    BadRequest,
    /// Configuration error - missing or invalid credentials/config.
    ConfigurationError,
    /// Internal provider error - unexpected state, bug.
    InternalError,
}

impl ZoomErrorCode {
    /// Returns true if this error is transient and the operation may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::RateLimited | Self::ServerError
        )
    }

    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "authentication_failed",
            Self::NetworkError => "network_error",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ConfigurationError => "configuration_error",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ZoomErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while talking to the Zoom API.
#[derive(Debug, Error)]
pub struct ZoomError {
    /// The error code categorizing this error.
    code: ZoomErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The endpoint that produced this error, when known.
    endpoint: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ZoomError {
    /// Creates a new error with the given code and message.
    pub fn new(code: ZoomErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            endpoint: None,
            source: None,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::AuthenticationFailed, message)
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::NetworkError, message)
    }

    /// Creates a rate limit error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::RateLimited, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::ServerError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::InvalidResponse, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::NotFound, message)
    }

    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::BadRequest, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::ConfigurationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ZoomErrorCode::InternalError, message)
    }

    /// Sets the endpoint for this error.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ZoomErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the endpoint, if set.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns true if this error is transient and may be retried.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for ZoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref endpoint) = self.endpoint {
            write!(f, "[{}] ", endpoint)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for Zoom API operations.
pub type ZoomResult<T> = Result<T, ZoomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_retryable() {
        assert!(ZoomErrorCode::NetworkError.is_retryable());
        assert!(ZoomErrorCode::RateLimited.is_retryable());
        assert!(ZoomErrorCode::ServerError.is_retryable());
        assert!(!ZoomErrorCode::AuthenticationFailed.is_retryable());
        assert!(!ZoomErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn error_code_display() {
        assert_eq!(
            ZoomErrorCode::AuthenticationFailed.as_str(),
            "authentication_failed"
        );
        assert_eq!(ZoomErrorCode::RateLimited.as_str(), "rate_limited");
    }

    #[test]
    fn error_creation() {
        let err = ZoomError::authentication("token exchange rejected");
        assert_eq!(err.code(), ZoomErrorCode::AuthenticationFailed);
        assert_eq!(err.message(), "token exchange rejected");
        assert!(err.endpoint().is_none());
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_with_endpoint() {
        let err = ZoomError::network("connection timeout").with_endpoint("/users/me/meetings");
        assert_eq!(err.code(), ZoomErrorCode::NetworkError);
        assert_eq!(err.endpoint(), Some("/users/me/meetings"));
        assert!(err.is_retryable());
    }

    #[test]
    fn error_display() {
        let err = ZoomError::rate_limited("too many requests").with_endpoint("/users/me");
        let display = format!("{}", err);
        assert!(display.contains("[/users/me]"));
        assert!(display.contains("rate_limited"));
        assert!(display.contains("too many requests"));
    }

    #[test]
    fn error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ZoomError::internal("failed to persist token").with_source(io_err);
        assert!(err.source().is_some());
    }
}
