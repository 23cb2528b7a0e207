//! Tracing setup for zoomsum.
//!
//! The console layer stays human-readable while an optional file layer
//! records the full diagnostic trail (request timings, errors) for a run.
//!
//! # Usage
//!
//! ```ignore
//! use zoomsum_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::default()).expect("failed to initialize tracing");
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),

    /// Failed to open the log file
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        /// The log file path that could not be opened.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when RUST_LOG is not set
    pub default_level: Level,
    /// Custom env filter directive (overrides default_level if set)
    pub env_filter: Option<String>,
    /// Optional log file receiving the detailed trace
    pub log_file: Option<PathBuf>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            env_filter: None,
            log_file: None,
        }
    }
}

impl TracingConfig {
    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set a custom env filter directive
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Set the log file path
    #[must_use]
    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// This should be called once at the start of the application.
/// The `RUST_LOG` environment variable can be used to override the default
/// level.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set, if the
/// env filter directive is invalid, or if the log file cannot be opened.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = build_subscriber(&config)?;
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Builds the layered subscriber: a filtered console layer plus, when a log
/// file is configured, a file layer that always records down to DEBUG so the
/// diagnostic trail survives a quieter console level.
fn build_subscriber(
    config: &TracingConfig,
) -> Result<impl tracing::Subscriber + Send + Sync, TracingError> {
    let env_filter = if let Some(ref filter) = config.env_filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "zoomsum_core={level},zoomsum_zoom={level},zoomsum_cli={level}",
                level = config.default_level
            ))
        })
    };

    let console_layer = fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_filter(env_filter);

    let file_layer = match config.log_file {
        Some(ref path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| TracingError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer))
}
