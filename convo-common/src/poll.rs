//! Generic polling scheduler
//!
//! Drives a pluggable derivation step on a fixed interval. Each cycle runs
//! derive then sleep; errors raised by the step are caught here, logged and
//! treated as "no update"; they never terminate the loop. Cancellation is
//! cooperative and observed only between cycles, never mid-derive or
//! mid-sleep.

use crate::{Error, Result};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Result of one derivation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The artifact file was rewritten.
    Updated,
    /// A value was derived but matched the previous one; no write.
    Unchanged,
    /// Preconditions not met (no new input, stream missing, ...); no work done.
    Skipped,
}

/// A single derivation step, polled by [`Poller`].
#[allow(async_fn_in_trait)]
pub trait Deriver {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Perform one derivation cycle.
    async fn step(&mut self) -> Result<StepOutcome>;
}

/// Fixed-interval scheduler for a [`Deriver`].
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    step_budget: Option<Duration>,
}

impl Poller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            step_budget: None,
        }
    }

    /// Bound each derivation step; a step that overruns counts as a failed
    /// cycle. Guards against a hanging external call stalling the loop.
    pub fn with_step_budget(mut self, budget: Duration) -> Self {
        self.step_budget = Some(budget);
        self
    }

    /// Run the polling loop until `cancel` is observed at a cycle boundary.
    pub async fn run<D: Deriver>(&self, mut deriver: D, cancel: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs_f64(),
            "Starting {} polling loop",
            deriver.name()
        );

        loop {
            if cancel.is_cancelled() {
                info!("{} polling loop stopped", deriver.name());
                return;
            }

            let result = match self.step_budget {
                Some(budget) => match tokio::time::timeout(budget, deriver.step()).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::StepTimeout(budget)),
                },
                None => deriver.step().await,
            };

            match result {
                Ok(StepOutcome::Updated) => debug!("{} cycle: artifact updated", deriver.name()),
                Ok(StepOutcome::Unchanged) => trace!("{} cycle: unchanged", deriver.name()),
                Ok(StepOutcome::Skipped) => trace!("{} cycle: skipped", deriver.name()),
                Err(e) => warn!("{} cycle failed: {}", deriver.name(), e),
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
