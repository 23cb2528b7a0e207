//! zoomsum CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::{Level, info};

use zoomsum_cli::cli::Cli;
use zoomsum_cli::config::AppConfig;
use zoomsum_cli::error::{CliError, CliResult};
use zoomsum_cli::report;
use zoomsum_core::time::ReportWindow;
use zoomsum_core::tracing::{TracingConfig, init_tracing};
use zoomsum_zoom::{Authenticator, TokenCache, TokenStore, ZoomClient, ZoomConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut tracing_config = TracingConfig::default().with_level(if cli.debug {
        Level::DEBUG
    } else {
        Level::INFO
    });
    if let Some(path) = log_file_path(&cli, &config) {
        tracing_config = tracing_config.with_log_file(path);
    }
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("error: {}", CliError::Tracing(e));
        return ExitCode::FAILURE;
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig, String> {
    match cli.config {
        Some(ref path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
}

/// Resolves the log file path, or `None` when the log file is disabled.
fn log_file_path(cli: &Cli, config: &AppConfig) -> Option<PathBuf> {
    if cli.no_log_file || config.log.disabled {
        return None;
    }
    cli.log_file
        .clone()
        .or_else(|| config.log.file.clone())
        .or_else(|| {
            Some(PathBuf::from(format!(
                "zoomsum_{}.log",
                Utc::now().format("%Y%m%d_%H%M%S")
            )))
        })
}

async fn run(cli: Cli, config: AppConfig) -> CliResult<()> {
    let credentials = config.zoom.credentials().map_err(CliError::Config)?;

    let mut zoom_config =
        ZoomConfig::new(credentials).with_timeout(Duration::from_secs(cli.timeout));
    if let Some(user) = cli.user.clone().or_else(|| config.zoom.user.clone()) {
        zoom_config = zoom_config.with_user(user);
    }
    zoom_config.validate().map_err(CliError::Zoom)?;

    let authenticator = Authenticator::new(&zoom_config);
    let mut cache = TokenCache::new(authenticator);
    if cli.cache_token || config.zoom.cache_token {
        let path = config
            .zoom
            .token_cache_path
            .clone()
            .unwrap_or_else(AppConfig::default_token_cache_path);
        cache = cache.with_store(TokenStore::new(path));
    }

    let client = ZoomClient::new(&zoom_config);

    // Authentication failure is fatal
    let token = cache.get_token().await?;
    println!("[ok] authenticated");

    let user = if zoom_config.user == "me" {
        let user = client.current_user(&token).await?;
        println!(
            "[ok] acting as {}",
            user.email.as_deref().unwrap_or(&user.id)
        );
        user.id
    } else {
        zoom_config.user.clone()
    };

    let window = ReportWindow::trailing(Utc::now(), cli.days);
    println!("Fetching meetings from {}", window);

    // Listing failure is fatal: there is no sensible summary without it
    let token = cache.get_token().await?;
    let meetings = client.list_meetings(&token, &user, &window).await?;
    println!("[ok] fetched {} meetings", meetings.len());
    info!("fetched {} meetings in window {}", meetings.len(), window);

    let cache_ref = &cache;
    let client_ref = &client;
    let summaries = report::summarize(meetings, move |meeting| {
        let meeting_id = meeting.id;
        async move {
            let token = cache_ref.get_token().await?;
            client_ref.list_participants(&token, meeting_id).await
        }
    })
    .await;

    println!("\nMeeting summary for the last {} days ({}):\n", cli.days, window);
    report::emit(&summaries);

    let unavailable = summaries
        .iter()
        .filter(|s| s.participant_count().is_none())
        .count();
    if unavailable > 0 {
        println!(
            "note: participants unavailable for {} of {} meetings (see log for details)",
            unavailable,
            summaries.len()
        );
    }

    info!("run completed: {} meetings summarized", summaries.len());
    Ok(())
}
