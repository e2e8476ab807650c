//! Suggestion derivation step

use crate::oracle::{SuggestOracle, SuggestionOutcome};
use convo_common::artifact::{ArtifactWriter, WritePolicy};
use convo_common::poll::{Deriver, StepOutcome};
use convo_common::stream;
use convo_common::Result;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Snapshot suggestion monitor.
///
/// Profile and catalog are loaded once at startup; the transcript is
/// re-read whole every cycle. All three must be non-empty before the oracle
/// is consulted. By default every successful non-empty result rewrites the
/// artifact, matching the historical behavior; `WritePolicy::OnChange`
/// aligns it with the other consumers.
pub struct SuggestionMonitor<O: SuggestOracle> {
    stream: PathBuf,
    artifact: ArtifactWriter,
    oracle: O,
    profile: String,
    catalog: String,
}

impl<O: SuggestOracle> SuggestionMonitor<O> {
    pub fn new(
        stream: PathBuf,
        artifact: PathBuf,
        policy: WritePolicy,
        oracle: O,
        profile: String,
        catalog: String,
    ) -> Self {
        Self {
            stream,
            artifact: ArtifactWriter::new(artifact, policy),
            oracle,
            profile,
            catalog,
        }
    }
}

impl<O: SuggestOracle> Deriver for SuggestionMonitor<O> {
    fn name(&self) -> &str {
        "suggest"
    }

    async fn step(&mut self) -> Result<StepOutcome> {
        let transcript = stream::read_all(&self.stream)?;
        if self.profile.trim().is_empty()
            || self.catalog.trim().is_empty()
            || transcript.trim().is_empty()
        {
            debug!("profile, catalog or transcript empty; skipping suggestion cycle");
            return Ok(StepOutcome::Skipped);
        }

        match self
            .oracle
            .suggest(&self.profile, &transcript, &self.catalog)
            .await
        {
            SuggestionOutcome::Produced(set) => {
                let body = serde_json::to_string_pretty(&set)?;
                if self.artifact.write(&body)? {
                    info!(count = set.product_ids.len(), "suggestions written");
                    Ok(StepOutcome::Updated)
                } else {
                    Ok(StepOutcome::Unchanged)
                }
            }
            SuggestionOutcome::Empty => {
                debug!("no relevant products this cycle");
                Ok(StepOutcome::Skipped)
            }
            SuggestionOutcome::Failed(reason) => {
                // No retry here; the next scheduled poll is the retry path.
                warn!(%reason, "oracle call failed");
                Ok(StepOutcome::Skipped)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{ProductSuggestion, SuggestionSet};
    use std::cell::{Cell, RefCell};

    struct StubOracle {
        outcomes: RefCell<Vec<SuggestionOutcome>>,
        calls: Cell<usize>,
    }

    impl StubOracle {
        fn new(outcomes: Vec<SuggestionOutcome>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes),
                calls: Cell::new(0),
            }
        }
    }

    impl SuggestOracle for StubOracle {
        async fn suggest(
            &self,
            _profile: &str,
            _transcript: &str,
            _catalog: &str,
        ) -> SuggestionOutcome {
            self.calls.set(self.calls.get() + 1);
            self.outcomes.borrow_mut().remove(0)
        }
    }

    fn produced(ids: &[i64]) -> SuggestionOutcome {
        SuggestionOutcome::Produced(SuggestionSet {
            product_ids: ids
                .iter()
                .map(|&product_id| ProductSuggestion {
                    product_id,
                    reasoning: "fits the conversation".to_string(),
                })
                .collect(),
        })
    }

    fn monitor(
        dir: &tempfile::TempDir,
        policy: WritePolicy,
        oracle: StubOracle,
        profile: &str,
        catalog: &str,
    ) -> SuggestionMonitor<StubOracle> {
        SuggestionMonitor::new(
            dir.path().join("stream.txt"),
            dir.path().join("suggestions.txt"),
            policy,
            oracle,
            profile.to_string(),
            catalog.to_string(),
        )
    }

    #[tokio::test]
    async fn empty_inputs_skip_without_consulting_the_oracle() {
        let dir = tempfile::tempdir().unwrap();

        // Missing transcript
        let mut m = monitor(&dir, WritePolicy::Always, StubOracle::new(vec![]), "p", "c");
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);

        // Empty profile
        std::fs::write(dir.path().join("stream.txt"), "some transcript\n").unwrap();
        let mut m = monitor(&dir, WritePolicy::Always, StubOracle::new(vec![]), " ", "c");
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);

        // Empty catalog
        let mut m = monitor(&dir, WritePolicy::Always, StubOracle::new(vec![]), "p", "");
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);

        assert!(!dir.path().join("suggestions.txt").exists());
    }

    #[tokio::test]
    async fn produced_suggestions_are_written_and_parse_against_the_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "transcript\n").unwrap();

        let mut m = monitor(
            &dir,
            WritePolicy::Always,
            StubOracle::new(vec![produced(&[7, 2])]),
            "profile",
            "catalog",
        );
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);

        let body = std::fs::read_to_string(dir.path().join("suggestions.txt")).unwrap();
        let set: SuggestionSet = serde_json::from_str(&body).unwrap();
        assert_eq!(set.product_ids.len(), 2);
        assert_eq!(set.product_ids[0].product_id, 7);
    }

    #[tokio::test]
    async fn empty_and_failed_outcomes_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "transcript\n").unwrap();

        let mut m = monitor(
            &dir,
            WritePolicy::Always,
            StubOracle::new(vec![
                SuggestionOutcome::Empty,
                SuggestionOutcome::Failed("Schema violation: not json".to_string()),
            ]),
            "profile",
            "catalog",
        );
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Skipped);
        assert_eq!(m.oracle.calls.get(), 2);
        assert!(!dir.path().join("suggestions.txt").exists());
    }

    #[tokio::test]
    async fn always_policy_rewrites_identical_results() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "transcript\n").unwrap();

        let mut m = monitor(
            &dir,
            WritePolicy::Always,
            StubOracle::new(vec![produced(&[1]), produced(&[1])]),
            "profile",
            "catalog",
        );
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);
    }

    #[tokio::test]
    async fn on_change_policy_suppresses_identical_results() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stream.txt"), "transcript\n").unwrap();

        let mut m = monitor(
            &dir,
            WritePolicy::OnChange,
            StubOracle::new(vec![produced(&[1]), produced(&[1]), produced(&[2])]),
            "profile",
            "catalog",
        );
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Unchanged);
        assert_eq!(m.step().await.unwrap(), StepOutcome::Updated);
    }
}
