//! Engagement ranking score.
//!
//! The score orders the discovery feed. It is a fixed weighted sum of
//! per-view rates, clamped to `[0, 100]`:
//!
//! ```text
//! 40·completions + 30·saves + 20·shares + 10·clicks − 20·skips
//! ─────────────────────────────────────────────────────────────
//!                           views
//! ```

use explore_db::entities::explore_engagement::{self, EngagementType};
use serde::Serialize;

const COMPLETION_WEIGHT: f64 = 40.0;
const SAVE_WEIGHT: f64 = 30.0;
const SHARE_WEIGHT: f64 = 20.0;
const CLICK_WEIGHT: f64 = 10.0;
const SKIP_WEIGHT: f64 = 20.0;

/// Upper bound of the score.
pub const MAX_SCORE: f64 = 100.0;

/// The six counters the score is computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngagementCounters {
    pub views: u64,
    /// View events flagged as watched to the end.
    pub completions: u64,
    pub saves: u64,
    pub shares: u64,
    pub clicks: u64,
    pub skips: u64,
}

impl EngagementCounters {
    /// Count the events by kind.
    #[must_use]
    pub fn tally<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a explore_engagement::Model>,
    {
        let mut counters = Self::default();
        for event in events {
            match event.engagement_type {
                EngagementType::View => {
                    counters.views += 1;
                    if event.completed {
                        counters.completions += 1;
                    }
                }
                EngagementType::Save => counters.saves += 1,
                EngagementType::Share => counters.shares += 1,
                EngagementType::Click => counters.clicks += 1,
                EngagementType::Skip => counters.skips += 1,
            }
        }
        counters
    }

    /// Ranking score of these counters.
    #[must_use]
    pub fn score(&self) -> f64 {
        engagement_score(
            self.views,
            self.completions,
            self.saves,
            self.shares,
            self.clicks,
            self.skips,
        )
    }

    /// Completions per view, zero without views.
    #[must_use]
    pub fn completion_rate(&self) -> f64 {
        ratio(self.completions, self.views)
    }

    /// Saves, shares and clicks per view, zero without views.
    #[must_use]
    pub fn engagement_rate(&self) -> f64 {
        ratio(self.interactions(), self.views)
    }

    /// Saves, shares and clicks combined.
    #[must_use]
    pub const fn interactions(&self) -> u64 {
        self.saves + self.shares + self.clicks
    }
}

/// Compute the ranking score. Zero views score exactly zero.
#[must_use]
pub fn engagement_score(
    views: u64,
    completions: u64,
    saves: u64,
    shares: u64,
    clicks: u64,
    skips: u64,
) -> f64 {
    if views == 0 {
        return 0.0;
    }

    // One division keeps integer-valued examples exact.
    let weighted = COMPLETION_WEIGHT * completions as f64
        + SAVE_WEIGHT * saves as f64
        + SHARE_WEIGHT * shares as f64
        + CLICK_WEIGHT * clicks as f64
        - SKIP_WEIGHT * skips as f64;

    (weighted / views as f64).clamp(0.0, MAX_SCORE)
}

/// `numerator / denominator`, zero when the denominator is zero.
#[must_use]
pub fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
