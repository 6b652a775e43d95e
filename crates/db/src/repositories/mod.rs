//! Data access repositories.

pub mod affiliation;
pub mod explore_content;
pub mod explore_engagement;
pub mod explore_feed_session;
pub mod explore_video;
pub mod reference;

pub use affiliation::AffiliationRepository;
pub use explore_content::{CachedAnalyticsUpdate, ExploreContentRepository};
pub use explore_engagement::ExploreEngagementRepository;
pub use explore_feed_session::ExploreFeedSessionRepository;
pub use explore_video::ExploreVideoRepository;
pub use reference::ReferenceRepository;
