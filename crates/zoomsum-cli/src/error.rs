//! CLI error types.

use std::fmt;

use zoomsum_core::TracingError;
use zoomsum_zoom::ZoomError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),
    /// Zoom API error.
    Zoom(ZoomError),
    /// Tracing initialization error.
    Tracing(TracingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Zoom(err) => write!(f, "zoom error: {}", err),
            Self::Tracing(err) => write!(f, "tracing error: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Zoom(err) => Some(err),
            Self::Tracing(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<ZoomError> for CliError {
    fn from(err: ZoomError) -> Self {
        Self::Zoom(err)
    }
}

impl From<TracingError> for CliError {
    fn from(err: TracingError) -> Self {
        Self::Tracing(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoomsum_core::tracing::{TracingConfig, init_tracing};

    #[test]
    fn tracing_init_failure_maps_to_cli_error() {
        let err = init_tracing(TracingConfig::default().with_env_filter("nope=notalevel"))
            .unwrap_err();
        let cli_err = CliError::from(err);
        assert!(cli_err.to_string().contains("env filter"));
    }

    #[test]
    fn zoom_error_keeps_its_source() {
        use std::error::Error;
        let cli_err = CliError::from(ZoomError::server("boom"));
        assert!(cli_err.source().is_some());
        assert!(cli_err.to_string().contains("server_error"));
    }
}
