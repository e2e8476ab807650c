//! convo-sentiment - Sentiment monitoring process
//!
//! Polls the shared stream for new content and maintains the sentiment
//! artifact file (`POSITIVE` / `NEGATIVE`).

use anyhow::{Context, Result};
use clap::Parser;
use convo_common::config::Settings;
use convo_common::poll::Poller;
use convo_common::shutdown::shutdown_token;
use convo_sentiment::{LexiconScorer, SentimentMonitor};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for convo-sentiment
#[derive(Parser, Debug)]
#[command(name = "convo-sentiment")]
#[command(about = "Sentiment monitor for the convo monitoring pipeline")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CONVO_CONFIG")]
    config: Option<PathBuf>,

    /// Stream file to monitor
    #[arg(short, long, env = "CONVO_STREAM")]
    stream: Option<PathBuf>,

    /// Sentiment artifact file
    #[arg(short, long, env = "CONVO_SENTIMENT_ARTIFACT")]
    artifact: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long, env = "CONVO_SENTIMENT_INTERVAL")]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convo_sentiment=debug,convo_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;

    let stream = args.stream.unwrap_or(settings.stream.file);
    let artifact = args.artifact.unwrap_or(settings.sentiment.artifact);
    let interval = args.interval_secs.unwrap_or(settings.sentiment.interval_secs);

    info!("Starting convo-sentiment");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Stream: {}", stream.display());
    info!("Artifact: {}", artifact.display());

    let monitor = SentimentMonitor::new(stream, artifact, LexiconScorer::new());
    let poller = Poller::new(Duration::from_secs(interval));
    poller.run(monitor, shutdown_token()).await;

    info!("convo-sentiment shutdown complete");
    Ok(())
}
