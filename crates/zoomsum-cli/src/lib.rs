//! CLI, configuration, and the summary pipeline.

pub mod cli;
pub mod config;
pub mod error;
pub mod report;
