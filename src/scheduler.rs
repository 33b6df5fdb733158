use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{ErrorPolicy, SchedulerConfig};
use crate::plugins::traits::{ComparisonResult, NotifierPlugin, PriceFetcher, TrackerPlugin};
use crate::shutdown::Shutdown;
use crate::utils::error::Result;

/// What the loop remembers between checks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PollState {
    pub last_price: f64,
    pub was_stable: bool,
    /// Number of successful checks so far.
    pub run_count: u64,
}

impl PollState {
    pub fn is_first_run(&self) -> bool {
        self.run_count == 0
    }

    pub fn advance(self, new_price: f64, now_stable: bool) -> Self {
        PollState {
            last_price: new_price,
            was_stable: now_stable,
            run_count: self.run_count + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub completed_runs: u64,
    pub failed_runs: u64,
}

pub struct PriceScheduler {
    fetcher: Arc<dyn PriceFetcher>,
    tracker: Box<dyn TrackerPlugin>,
    notifier: Box<dyn NotifierPlugin>,
    config: SchedulerConfig,
    state: PollState,
    stats: PollStats,
}

impl PriceScheduler {
    pub fn new(
        fetcher: Arc<dyn PriceFetcher>,
        tracker: Box<dyn TrackerPlugin>,
        notifier: Box<dyn NotifierPlugin>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            fetcher,
            tracker,
            notifier,
            config,
            state: PollState::default(),
            stats: PollStats::default(),
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Fetch, classify and report once. State only moves on success.
    pub async fn check_once(&mut self) -> Result<ComparisonResult> {
        let new_price = self.fetcher.fetch_price(&self.config.url).await?;

        let result = self.tracker.compare(
            self.state.last_price,
            new_price,
            self.state.is_first_run(),
            self.state.was_stable,
        );
        self.notifier.report(&result.message, result.overwrite_previous)?;

        self.state = self.state.advance(new_price, result.now_stable);
        debug!(
            run = self.state.run_count,
            price = new_price,
            change = ?result.change_type,
            "Price check completed"
        );
        Ok(result)
    }

    /// Poll until `shutdown` fires. Under `ErrorPolicy::Fatal` the first failed
    /// check ends the loop with that error.
    pub async fn run(&mut self, mut shutdown: Shutdown) -> Result<PollStats> {
        info!(
            url = %self.config.url,
            interval = ?self.config.interval,
            tracker = self.tracker.name(),
            notifier = self.notifier.name(),
            "Price scheduler started"
        );

        loop {
            if shutdown.is_triggered() {
                break;
            }

            let outcome = tokio::select! {
                outcome = self.check_once() => outcome,
                _ = shutdown.wait() => break,
            };

            match outcome {
                Ok(_) => self.stats.completed_runs += 1,
                Err(e) => {
                    self.stats.failed_runs += 1;
                    match self.config.on_error {
                        ErrorPolicy::Fatal => {
                            error!(category = e.category(), error = %e, "Price check failed, stopping");
                            return Err(e);
                        }
                        ErrorPolicy::Skip => {
                            warn!(category = e.category(), error = %e, "Price check failed, skipping");
                        }
                    }
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = shutdown.wait() => break,
            }
        }

        let reason = shutdown.reason().map(|r| r.to_string());
        info!(
            completed = self.stats.completed_runs,
            failed = self.stats.failed_runs,
            reason = reason.as_deref().unwrap_or("unknown"),
            "Price scheduler stopped"
        );
        Ok(self.stats)
    }
}
