//! Explore content entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Who published a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CreatorType {
    /// Independent user with no professional profile.
    #[sea_orm(string_value = "user")]
    User,
    /// Real-estate agent.
    #[sea_orm(string_value = "agent")]
    Agent,
    /// Property developer.
    #[sea_orm(string_value = "developer")]
    Developer,
    /// Agency account.
    #[sea_orm(string_value = "agency")]
    Agency,
}

/// One published Explore video.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "explore_content")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Creator user ID.
    #[sea_orm(indexed)]
    pub creator_id: String,

    pub creator_type: CreatorType,

    /// Set only when the creator is an agency-affiliated agent.
    #[sea_orm(nullable)]
    pub agency_id: Option<String>,

    #[sea_orm(nullable)]
    pub property_id: Option<String>,

    #[sea_orm(nullable)]
    pub development_id: Option<String>,

    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Tags, a JSON string array.
    #[sea_orm(column_type = "JsonBinary")]
    pub tags: Json,

    /// Lifestyle categories, a JSON string array.
    #[sea_orm(column_type = "JsonBinary")]
    pub lifestyle_categories: Json,

    #[sea_orm(nullable)]
    pub latitude: Option<f64>,

    #[sea_orm(nullable)]
    pub longitude: Option<f64>,

    #[sea_orm(nullable)]
    pub price_min: Option<i64>,

    #[sea_orm(nullable)]
    pub price_max: Option<i64>,

    /// Facts copied from the showcased subject (bedrooms, bathrooms).
    #[sea_orm(column_type = "JsonBinary")]
    pub metadata: Json,

    #[sea_orm(column_type = "Text")]
    pub video_url: String,

    #[sea_orm(column_type = "Text")]
    pub thumbnail_url: String,

    pub duration_seconds: f64,

    // Cached analytics
    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    /// Total watch time in seconds.
    #[sea_orm(default_value = 0)]
    pub total_watch_time: i64,

    #[sea_orm(default_value = 0.0)]
    pub completion_rate: f64,

    #[sea_orm(default_value = 0)]
    pub save_count: i32,

    #[sea_orm(default_value = 0)]
    pub share_count: i32,

    #[sea_orm(default_value = 0)]
    pub click_through_count: i32,

    /// Ranking score in `[0, 100]`.
    #[sea_orm(indexed, default_value = 0.0)]
    pub engagement_score: f64,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(default_value = false)]
    pub is_featured: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::explore_video::Entity")]
    Videos,
    #[sea_orm(has_many = "super::explore_engagement::Entity")]
    Engagements,
}

impl Related<super::explore_video::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<super::explore_engagement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Engagements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
