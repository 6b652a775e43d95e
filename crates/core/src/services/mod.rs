//! Business logic services.

#![allow(missing_docs)]

pub mod affiliation;
pub mod analytics;
pub mod content;
pub mod recompute;
pub mod scoring;
pub mod sweep_scheduler;
pub mod upload;
pub mod validation;

pub use affiliation::{Affiliation, AffiliationResolver};
pub use analytics::{
    AnalyticsService, CreatorAnalytics, EngagementSummary, SessionAnalytics, TopVideo,
    VideoAnalytics,
};
pub use content::{AnalyticsPatch, ContentService, RegisteredVideo};
pub use recompute::{RecomputeService, Sweep, SweepReport};
pub use scoring::{EngagementCounters, engagement_score};
pub use sweep_scheduler::{SweepExecutor, SweepSchedule, spawn_sweeps};
pub use upload::{UploadBroker, UploadTargets};
pub use validation::{ValidationReport, VideoMetadata, validate_duration, validate_metadata};
