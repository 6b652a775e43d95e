//! Explore video entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The playable video row addressed by the feed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "explore_video")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning content ID.
    #[sea_orm(indexed)]
    pub content_id: String,

    #[sea_orm(indexed)]
    pub creator_id: String,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub video_url: String,

    #[sea_orm(column_type = "Text")]
    pub thumbnail_url: String,

    pub duration_seconds: f64,

    #[sea_orm(default_value = 0)]
    pub view_count: i32,

    #[sea_orm(default_value = 0.0)]
    pub completion_rate: f64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::explore_content::Entity",
        from = "Column::ContentId",
        to = "super::explore_content::Column::Id",
        on_delete = "Cascade"
    )]
    Content,
}

impl Related<super::explore_content::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Content.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
