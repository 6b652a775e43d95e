//! Development reference entity (read-only).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A multi-unit development that a video can showcase.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "development")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub latitude: Option<f64>,

    #[sea_orm(nullable)]
    pub longitude: Option<f64>,

    /// Lowest unit price.
    #[sea_orm(nullable)]
    pub price_from: Option<i64>,

    /// Highest unit price.
    #[sea_orm(nullable)]
    pub price_to: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
