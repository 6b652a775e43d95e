//! Batch recomputation of cached analytics.
//!
//! Each sweep lists its rows, recomputes every row from that row's own event
//! history and writes it back with one independent statement. A failing row
//! is recorded and skipped.

use std::fmt;

use explore_common::{AppError, AppResult, DateWindow};
use explore_db::repositories::{
    ExploreContentRepository, ExploreEngagementRepository, ExploreVideoRepository,
};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::services::scoring::EngagementCounters;

/// Which cached value a sweep maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sweep {
    EngagementScore,
    CompletionRate,
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EngagementScore => f.write_str("engagement_score"),
            Self::CompletionRate => f.write_str("completion_rate"),
        }
    }
}

/// Outcome of one sweep run.
#[derive(Debug)]
pub struct SweepReport {
    pub sweep: Sweep,
    /// Rows visited.
    pub processed: usize,
    /// Rows written back.
    pub updated: usize,
    /// Rows skipped, with the error that stopped them.
    pub failures: Vec<(String, AppError)>,
}

impl SweepReport {
    fn new(sweep: Sweep) -> Self {
        Self {
            sweep,
            processed: 0,
            updated: 0,
            failures: Vec::new(),
        }
    }

    fn record(&mut self, id: String, outcome: AppResult<()>) {
        self.processed += 1;
        match outcome {
            Ok(()) => self.updated += 1,
            Err(e) => {
                warn!(sweep = %self.sweep, id = %id, error = %e, "Sweep row failed");
                self.failures.push((id, e));
            }
        }
    }

    /// Whether rows were visited and none of them could be written.
    #[must_use]
    pub const fn all_failed(&self) -> bool {
        self.processed > 0 && self.updated == 0
    }

    fn log_summary(&self) {
        if self.all_failed() {
            error!(
                sweep = %self.sweep,
                processed = self.processed,
                "Every row of the sweep failed"
            );
        } else {
            info!(
                sweep = %self.sweep,
                processed = self.processed,
                updated = self.updated,
                failed = self.failures.len(),
                "Sweep finished"
            );
        }
    }
}

/// Service running the recomputation sweeps.
#[derive(Clone)]
pub struct RecomputeService {
    content_repo: ExploreContentRepository,
    video_repo: ExploreVideoRepository,
    engagement_repo: ExploreEngagementRepository,
    concurrency: usize,
}

impl RecomputeService {
    /// Create a new recompute service processing up to `concurrency` rows at once.
    #[must_use]
    pub fn new(
        content_repo: ExploreContentRepository,
        video_repo: ExploreVideoRepository,
        engagement_repo: ExploreEngagementRepository,
        concurrency: usize,
    ) -> Self {
        Self {
            content_repo,
            video_repo,
            engagement_repo,
            concurrency: concurrency.max(1),
        }
    }

    /// Recompute the engagement score of every content row.
    ///
    /// Only a failure to list the rows is returned as an error.
    pub async fn recompute_engagement_scores(&self) -> AppResult<SweepReport> {
        let ids: Vec<String> = self
            .content_repo
            .find_all()
            .await?
            .into_iter()
            .map(|content| content.id)
            .collect();

        let outcomes: Vec<_> = stream::iter(ids)
            .map(|id| async move {
                let outcome = self.rescore(&id).await;
                (id, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = SweepReport::new(Sweep::EngagementScore);
        for (id, outcome) in outcomes {
            report.record(id, outcome);
        }
        report.log_summary();
        Ok(report)
    }

    async fn rescore(&self, content_id: &str) -> AppResult<()> {
        let events = self
            .engagement_repo
            .find_by_content(content_id, &DateWindow::unbounded())
            .await?;
        let score = EngagementCounters::tally(&events).score();

        self.content_repo
            .update_engagement_score(content_id, score)
            .await
    }

    /// Recompute the completion rate and view count of every video.
    ///
    /// Only a failure to list the rows is returned as an error.
    pub async fn recompute_completion_rates(&self) -> AppResult<SweepReport> {
        let videos: Vec<(String, String)> = self
            .video_repo
            .find_all()
            .await?
            .into_iter()
            .map(|video| (video.id, video.content_id))
            .collect();

        let outcomes: Vec<_> = stream::iter(videos)
            .map(|(video_id, content_id)| async move {
                let outcome = self.recount(&video_id, &content_id).await;
                (video_id, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = SweepReport::new(Sweep::CompletionRate);
        for (id, outcome) in outcomes {
            report.record(id, outcome);
        }
        report.log_summary();
        Ok(report)
    }

    async fn recount(&self, video_id: &str, content_id: &str) -> AppResult<()> {
        let events = self
            .engagement_repo
            .find_by_content(content_id, &DateWindow::unbounded())
            .await?;
        let counters = EngagementCounters::tally(&events);
        let view_count = i32::try_from(counters.views).map_err(|_| {
            AppError::Internal(format!("view count of video {video_id} overflows"))
        })?;

        self.video_repo
            .update_completion(video_id, counters.completion_rate(), view_count)
            .await
    }
}
