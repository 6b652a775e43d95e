//! Periodic scheduling of the recomputation sweeps.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use explore_common::{AppResult, ExploreConfig};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

use crate::services::recompute::{RecomputeService, Sweep, SweepReport};

/// Runs one sweep on demand.
#[async_trait]
pub trait SweepExecutor: Send + Sync {
    /// Run the given sweep to completion.
    async fn run_sweep(&self, sweep: Sweep) -> AppResult<SweepReport>;
}

#[async_trait]
impl SweepExecutor for RecomputeService {
    async fn run_sweep(&self, sweep: Sweep) -> AppResult<SweepReport> {
        match sweep {
            Sweep::EngagementScore => self.recompute_engagement_scores().await,
            Sweep::CompletionRate => self.recompute_completion_rates().await,
        }
    }
}

/// Sweep schedule.
#[derive(Debug, Clone)]
pub struct SweepSchedule {
    /// Interval of the engagement score sweep (default: 1 hour).
    pub score_interval: Duration,
    /// Interval of the completion rate sweep (default: 1 hour).
    pub completion_interval: Duration,
    /// Whether the first run happens immediately or after one interval.
    pub run_on_startup: bool,
}

impl Default for SweepSchedule {
    fn default() -> Self {
        Self::from(&ExploreConfig::default())
    }
}

impl From<&ExploreConfig> for SweepSchedule {
    fn from(config: &ExploreConfig) -> Self {
        Self {
            score_interval: Duration::from_secs(config.score_sweep_interval_secs.max(1)),
            completion_interval: Duration::from_secs(config.completion_sweep_interval_secs.max(1)),
            run_on_startup: config.sweep_on_startup,
        }
    }
}

/// Spawn one task per sweep. The tasks run until their handles are aborted.
pub fn spawn_sweeps<E: SweepExecutor + 'static>(
    schedule: &SweepSchedule,
    executor: Arc<E>,
) -> Vec<JoinHandle<()>> {
    vec![
        spawn_sweep(
            Sweep::EngagementScore,
            schedule.score_interval,
            schedule.run_on_startup,
            Arc::clone(&executor),
        ),
        spawn_sweep(
            Sweep::CompletionRate,
            schedule.completion_interval,
            schedule.run_on_startup,
            executor,
        ),
    ]
}

fn spawn_sweep<E: SweepExecutor + 'static>(
    sweep: Sweep,
    period: Duration,
    run_on_startup: bool,
    executor: Arc<E>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = if run_on_startup {
            interval(period)
        } else {
            interval_at(Instant::now() + period, period)
        };
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match executor.run_sweep(sweep).await {
                Ok(report) => {
                    tracing::debug!(
                        sweep = %sweep,
                        processed = report.processed,
                        failed = report.failures.len(),
                        "Scheduled sweep ran"
                    );
                }
                Err(e) => {
                    tracing::error!(sweep = %sweep, error = %e, "Failed to run sweep");
                }
            }
        }
    })
}
