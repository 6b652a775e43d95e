//! Explore feed session entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One viewer's continuous scroll through the discovery feed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "explore_feed_session")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub session_start: DateTimeWithTimeZone,

    /// Open sessions have no end yet.
    #[sea_orm(nullable)]
    pub session_end: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
