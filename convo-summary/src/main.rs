//! convo-summary - Dead-time summarization process
//!
//! Watches the shared stream and rewrites the summary artifact whenever the
//! settled document summarizes to something new.

use anyhow::{Context, Result};
use clap::Parser;
use convo_common::config::{resolve_api_key, Settings, API_KEY_ENV};
use convo_common::poll::Poller;
use convo_common::shutdown::shutdown_token;
use convo_summary::{ChatSummarizer, SummaryMonitor};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for convo-summary
#[derive(Parser, Debug)]
#[command(name = "convo-summary")]
#[command(about = "Dead-time summarizer for the convo monitoring pipeline")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CONVO_CONFIG")]
    config: Option<PathBuf>,

    /// Stream file to monitor
    #[arg(short, long, env = "CONVO_STREAM")]
    stream: Option<PathBuf>,

    /// Summary artifact file
    #[arg(short, long, env = "CONVO_SUMMARY_ARTIFACT")]
    artifact: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long, env = "CONVO_SUMMARY_INTERVAL")]
    interval_secs: Option<u64>,

    /// Seconds of stream inactivity before summarizing
    #[arg(long, env = "CONVO_DEAD_TIME")]
    dead_time_secs: Option<u64>,

    /// Oracle API key (prefer the environment variable)
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convo_summary=debug,convo_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;

    let stream = args.stream.unwrap_or(settings.stream.file);
    let artifact = args.artifact.unwrap_or(settings.summary.artifact);
    let interval = args.interval_secs.unwrap_or(settings.summary.interval_secs);
    let dead_time = args.dead_time_secs.unwrap_or(settings.summary.dead_time_secs);
    let api_key = resolve_api_key(args.api_key, &settings.oracle)?;

    info!("Starting convo-summary");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Stream: {}", stream.display());
    info!("Artifact: {}", artifact.display());
    info!("Dead time threshold: {}s", dead_time);

    let summarizer = ChatSummarizer::new(
        settings.oracle.base_url.clone(),
        api_key,
        settings.oracle.model.clone(),
    )
    .context("Failed to create summarizer client")?;

    let monitor = SummaryMonitor::new(
        stream,
        artifact,
        summarizer,
        Duration::from_secs(dead_time),
        settings.summary.min_length,
        settings.summary.max_length,
    );

    let poller = Poller::new(Duration::from_secs(interval))
        .with_step_budget(Duration::from_secs(settings.summary.step_budget_secs));
    poller.run(monitor, shutdown_token()).await;

    info!("convo-summary shutdown complete");
    Ok(())
}
