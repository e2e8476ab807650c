//! Sentiment derivation step

use crate::scorer::{Scorer, Sentiment};
use convo_common::artifact::{ArtifactWriter, WritePolicy};
use convo_common::poll::{Deriver, StepOutcome};
use convo_common::stream::StreamCursor;
use convo_common::Result;
use std::path::PathBuf;
use tracing::{debug, info};

/// Incremental sentiment monitor.
///
/// The scorer is contractually never invoked without new input: a cycle
/// with no stream growth (or whitespace-only growth) performs no scoring
/// and no I/O.
pub struct SentimentMonitor<S: Scorer> {
    cursor: StreamCursor,
    artifact: ArtifactWriter,
    scorer: S,
}

impl<S: Scorer> SentimentMonitor<S> {
    pub fn new(stream: PathBuf, artifact: PathBuf, scorer: S) -> Self {
        Self {
            cursor: StreamCursor::new(stream),
            artifact: ArtifactWriter::new(artifact, WritePolicy::OnChange),
            scorer,
        }
    }
}

impl<S: Scorer> Deriver for SentimentMonitor<S> {
    fn name(&self) -> &str {
        "sentiment"
    }

    async fn step(&mut self) -> Result<StepOutcome> {
        let new_text = self.cursor.read_new()?;
        if new_text.trim().is_empty() {
            debug!("no new stream content");
            return Ok(StepOutcome::Skipped);
        }

        let score = self.scorer.score(&new_text);
        let label = Sentiment::from_score(score);

        if self.artifact.write(label.as_str())? {
            info!(%label, score, "sentiment changed");
            Ok(StepOutcome::Updated)
        } else {
            Ok(StepOutcome::Unchanged)
        }
    }
}
