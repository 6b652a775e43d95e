//! Database entities.

pub mod agent;
pub mod developer;
pub mod development;
pub mod explore_content;
pub mod explore_engagement;
pub mod explore_feed_session;
pub mod explore_video;
pub mod property;

pub use agent::Entity as Agent;
pub use developer::Entity as Developer;
pub use development::Entity as Development;
pub use explore_content::Entity as ExploreContent;
pub use explore_engagement::Entity as ExploreEngagement;
pub use explore_feed_session::Entity as ExploreFeedSession;
pub use explore_video::Entity as ExploreVideo;
pub use property::Entity as Property;
