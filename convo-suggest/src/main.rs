//! convo-suggest - Product suggestion process
//!
//! Combines the static client profile and product catalog with the live
//! transcript and maintains a JSON artifact of up to three ranked product
//! suggestions.

use anyhow::{Context, Result};
use clap::Parser;
use convo_common::artifact::WritePolicy;
use convo_common::config::{resolve_api_key, Settings, API_KEY_ENV};
use convo_common::poll::Poller;
use convo_common::shutdown::shutdown_token;
use convo_suggest::{ChatOracle, SuggestionMonitor};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for convo-suggest
#[derive(Parser, Debug)]
#[command(name = "convo-suggest")]
#[command(about = "Product suggestion monitor for the convo monitoring pipeline")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CONVO_CONFIG")]
    config: Option<PathBuf>,

    /// Stream file to monitor
    #[arg(short, long, env = "CONVO_STREAM")]
    stream: Option<PathBuf>,

    /// Suggestion artifact file
    #[arg(short, long, env = "CONVO_SUGGEST_ARTIFACT")]
    artifact: Option<PathBuf>,

    /// Static client profile file
    #[arg(long, env = "CONVO_PROFILE")]
    profile: Option<PathBuf>,

    /// Static product catalog file
    #[arg(long, env = "CONVO_CATALOG")]
    catalog: Option<PathBuf>,

    /// Seconds between polls
    #[arg(long, env = "CONVO_SUGGEST_INTERVAL")]
    interval_secs: Option<u64>,

    /// Artifact rewrite policy: 'always' or 'on-change'
    #[arg(long, env = "CONVO_SUGGEST_REWRITE")]
    rewrite: Option<WritePolicy>,

    /// Oracle API key (prefer the environment variable)
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convo_suggest=debug,convo_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;

    let stream = args.stream.unwrap_or(settings.stream.file);
    let artifact = args.artifact.unwrap_or(settings.suggest.artifact);
    let profile_path = args.profile.unwrap_or(settings.suggest.profile);
    let catalog_path = args.catalog.unwrap_or(settings.suggest.catalog);
    let interval = args.interval_secs.unwrap_or(settings.suggest.interval_secs);
    let rewrite = args.rewrite.unwrap_or(settings.suggest.rewrite);
    let api_key = resolve_api_key(args.api_key, &settings.oracle)?;

    info!("Starting convo-suggest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Stream: {}", stream.display());
    info!("Artifact: {}", artifact.display());

    // Static inputs, loaded once for the process lifetime
    let profile = std::fs::read_to_string(&profile_path)
        .with_context(|| format!("Failed to read client profile {}", profile_path.display()))?;
    let catalog = std::fs::read_to_string(&catalog_path)
        .with_context(|| format!("Failed to read product catalog {}", catalog_path.display()))?;

    let oracle = ChatOracle::new(
        settings.oracle.base_url.clone(),
        api_key,
        settings.oracle.model.clone(),
    )
    .context("Failed to create oracle client")?;

    let monitor = SuggestionMonitor::new(stream, artifact, rewrite, oracle, profile, catalog);

    let poller = Poller::new(Duration::from_secs(interval))
        .with_step_budget(Duration::from_secs(settings.suggest.step_budget_secs));
    poller.run(monitor, shutdown_token()).await;

    info!("convo-suggest shutdown complete");
    Ok(())
}
