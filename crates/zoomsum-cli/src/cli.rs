//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

/// zoomsum - Zoom meeting attendance summaries for the trailing two weeks
#[derive(Debug, Parser)]
#[command(name = "zoomsum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ZOOMSUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Number of trailing days to cover
    #[arg(
        long,
        default_value_t = zoomsum_core::time::DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    pub days: i64,

    /// User whose meetings are listed (defaults to the app owner)
    #[arg(long, env = "ZOOM_USER")]
    pub user: Option<String>,

    /// Write the detailed log to this file instead of the default
    /// zoomsum_<timestamp>.log
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not write a log file
    #[arg(long)]
    pub no_log_file: bool,

    /// Cache the access token on disk between runs
    #[arg(long)]
    pub cache_token: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}
