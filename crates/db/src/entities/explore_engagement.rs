//! Explore engagement event entity.
//!
//! Rows are appended by the engagement recorder and never mutated here.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of viewer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EngagementType {
    #[sea_orm(string_value = "view")]
    View,
    #[sea_orm(string_value = "save")]
    Save,
    #[sea_orm(string_value = "share")]
    Share,
    #[sea_orm(string_value = "click")]
    Click,
    #[sea_orm(string_value = "skip")]
    Skip,
}

/// One immutable viewer interaction.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "explore_engagement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub content_id: String,

    #[sea_orm(indexed)]
    pub session_id: String,

    /// Viewer user ID; anonymous views have none.
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub engagement_type: EngagementType,

    /// Only meaningful on `view` events.
    #[sea_orm(default_value = false)]
    pub completed: bool,

    /// Watch time in seconds, never negative.
    #[sea_orm(default_value = 0)]
    pub watch_time: i32,

    #[sea_orm(indexed)]
    pub created_at: DateTimeWithTimeZone,
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
