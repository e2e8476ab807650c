//! Paced replay of a timestamped transcript
//!
//! Each source line is appended to the stream file and made visible
//! immediately. When both the previous and the current line carry a parsed
//! `HH:MM:SS` timestamp, emission waits for the scaled delta first. Untimed
//! lines inherit the last known timestamp and emit with no added delay, so a
//! run of untimed lines never accumulates waiting time.

use chrono::NaiveTime;
use convo_common::timestamp::{leading_timestamp, scaled_delay};
use convo_common::Result;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Replay configuration.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Source transcript file.
    pub input: PathBuf,
    /// Stream file to produce. Truncated at start; sole writer is this
    /// process.
    pub stream: PathBuf,
    /// Multiplier for timestamp deltas; 0.1 replays ten times faster.
    pub scale_factor: f64,
}

/// Replay the whole transcript, then return leaving the stream at its final
/// length.
pub async fn replay(config: &ReplayConfig) -> Result<()> {
    let transcript = std::fs::read_to_string(&config.input)?;
    let mut stream = std::fs::File::create(&config.stream)?;

    info!(
        input = %config.input.display(),
        stream = %config.stream.display(),
        scale_factor = config.scale_factor,
        "Starting transcript replay"
    );

    let mut previous: Option<NaiveTime> = None;
    let mut emitted = 0usize;

    for line in transcript.lines() {
        let current = leading_timestamp(line);

        if let (Some(prev), Some(cur)) = (previous, current) {
            let delay = scaled_delay(prev, cur, config.scale_factor);
            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }
        }

        // Unbuffered write: the line is visible to readers as soon as this
        // returns.
        stream.write_all(line.as_bytes())?;
        stream.write_all(b"\n")?;
        emitted += 1;
        debug!(line, "emitted");

        if current.is_some() {
            previous = current;
        }
    }

    info!(lines = emitted, "Transcript replay complete");
    Ok(())
}
