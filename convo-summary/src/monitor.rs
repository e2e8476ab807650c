//! Summary derivation step

use crate::summarizer::Summarize;
use convo_common::artifact::{ArtifactWriter, WritePolicy};
use convo_common::poll::{Deriver, StepOutcome};
use convo_common::stream;
use convo_common::Result;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Snapshot summarizer gated on stream dead time.
///
/// Summarization runs only once the stream has been quiet for at least the
/// dead-time threshold and the document is non-empty. A summarizer failure
/// becomes the artifact value itself (visible degradation); the loop never
/// dies for it.
pub struct SummaryMonitor<S: Summarize> {
    stream: PathBuf,
    artifact: ArtifactWriter,
    summarizer: S,
    dead_time: Duration,
    min_length: u32,
    max_length: u32,
}

impl<S: Summarize> SummaryMonitor<S> {
    pub fn new(
        stream: PathBuf,
        artifact: PathBuf,
        summarizer: S,
        dead_time: Duration,
        min_length: u32,
        max_length: u32,
    ) -> Self {
        Self {
            stream,
            artifact: ArtifactWriter::new(artifact, WritePolicy::OnChange),
            summarizer,
            dead_time,
            min_length,
            max_length,
        }
    }

    fn is_settled(&self, modified: SystemTime) -> bool {
        let dead_time = modified.elapsed().unwrap_or(Duration::ZERO);
        dead_time >= self.dead_time
    }
}

impl<S: Summarize> Deriver for SummaryMonitor<S> {
    fn name(&self) -> &str {
        "summary"
    }

    async fn step(&mut self) -> Result<StepOutcome> {
        let Some(modified) = stream::modified_time(&self.stream)? else {
            debug!(stream = %self.stream.display(), "waiting for stream file");
            return Ok(StepOutcome::Skipped);
        };

        if !self.is_settled(modified) {
            debug!("stream still active, not summarizing");
            return Ok(StepOutcome::Skipped);
        }

        let text = stream::read_all(&self.stream)?;
        if text.trim().is_empty() {
            return Ok(StepOutcome::Skipped);
        }

        let summary = match self
            .summarizer
            .summarize(&text, self.min_length, self.max_length)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!("summarization failed: {}", e);
                format!("Error summarizing: {}", e)
            }
        };

        if self.artifact.write(&summary)? {
            info!(chars = summary.len(), "summary updated");
            Ok(StepOutcome::Updated)
        } else {
            Ok(StepOutcome::Unchanged)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::SummarizerError;
    use std::cell::Cell;

    struct StubSummarizer {
        calls: Cell<usize>,
        fail: bool,
    }

    impl StubSummarizer {
        fn new(fail: bool) -> Self {
            Self {
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl Summarize for StubSummarizer {
        async fn summarize(
            &self,
            text: &str,
            _min_length: u32,
            _max_length: u32,
        ) -> std::result::Result<String, SummarizerError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                Err(SummarizerError::Network("connection refused".to_string()))
            } else {
                Ok(format!("summary of {} chars", text.len()))
            }
        }
    }

    fn monitor(
        dir: &tempfile::TempDir,
        summarizer: StubSummarizer,
        dead_time: Duration,
    ) -> SummaryMonitor<StubSummarizer> {
        SummaryMonitor::new(
            dir.path().join("stream.txt"),
            dir.path().join("summary.txt"),
            summarizer,
            dead_time,
            30,
            130,
        )
    }

    #[tokio::test]
    async fn missing_stream_is_a_logged_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut m = monitor(&dir, StubSummarizer::new(false), Duration::ZERO);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);
        assert_eq!(m.summarizer.calls.get(), 0);
    }

    #[tokio::test]
    async fn active_stream_defers_summarization() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "recent content\n").unwrap();

        // A one-hour threshold cannot have elapsed since the write above
        let mut m = monitor(&dir, StubSummarizer::new(false), Duration::from_secs(3600));
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);
        assert_eq!(m.summarizer.calls.get(), 0);
    }

    #[tokio::test]
    async fn empty_document_is_not_summarized() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "  \n").unwrap();

        let mut m = monitor(&dir, StubSummarizer::new(false), Duration::ZERO);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);
        assert_eq!(m.summarizer.calls.get(), 0);
    }

    #[tokio::test]
    async fn settled_document_is_summarized_once_per_settled_period() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "the whole conversation\n").unwrap();

        let mut m = monitor(&dir, StubSummarizer::new(false), Duration::ZERO);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);
        let written = std::fs::read_to_string(dir.path().join("summary.txt")).unwrap();
        assert!(written.starts_with("summary of"));

        // Repeated polls with unchanged content re-derive the same value
        // and suppress the write.
        assert_eq!(m.step().await.unwrap(), StepOutcome::Unchanged);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Unchanged);
        assert_eq!(m.summarizer.calls.get(), 3);
    }

    #[tokio::test]
    async fn summarizer_failure_becomes_the_artifact_value() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "content\n").unwrap();

        let mut m = monitor(&dir, StubSummarizer::new(true), Duration::ZERO);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);

        let written = std::fs::read_to_string(dir.path().join("summary.txt")).unwrap();
        assert!(written.starts_with("Error summarizing:"));
        assert!(written.contains("connection refused"));

        // The failure value is itself change-suppressed
        assert_eq!(m.step().await.unwrap(), StepOutcome::Unchanged);
    }
}
