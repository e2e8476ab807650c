//! convo-producer - Transcript replay process
//!
//! Replays a timestamped transcript into the shared stream file at a
//! configurable pace, then exits. The three monitor processes read the
//! stream independently.

use anyhow::{Context, Result};
use clap::Parser;
use convo_common::config::Settings;
use convo_producer::{replay, ReplayConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for convo-producer
#[derive(Parser, Debug)]
#[command(name = "convo-producer")]
#[command(about = "Transcript replay process for the convo monitoring pipeline")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CONVO_CONFIG")]
    config: Option<PathBuf>,

    /// Source transcript file
    #[arg(short, long, env = "CONVO_INPUT")]
    input: Option<PathBuf>,

    /// Stream file to produce
    #[arg(short, long, env = "CONVO_STREAM")]
    stream: Option<PathBuf>,

    /// Multiplier for timestamp deltas (below 1.0 speeds replay up)
    #[arg(long, env = "CONVO_SCALE_FACTOR")]
    scale_factor: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convo_producer=debug,convo_common=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref()).context("Failed to load configuration")?;

    let config = ReplayConfig {
        input: args.input.unwrap_or(settings.producer.input),
        stream: args.stream.unwrap_or(settings.stream.file),
        scale_factor: args.scale_factor.unwrap_or(settings.producer.scale_factor),
    };

    info!("Starting convo-producer");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    tokio::select! {
        result = replay(&config) => {
            result.context("Transcript replay failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, stopping replay");
        }
    }

    Ok(())
}
