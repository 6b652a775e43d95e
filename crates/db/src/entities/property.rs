//! Property reference entity (read-only).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A listed property that a video can showcase.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "property")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(nullable)]
    pub latitude: Option<f64>,

    #[sea_orm(nullable)]
    pub longitude: Option<f64>,

    /// Asking price.
    #[sea_orm(nullable)]
    pub price: Option<i64>,

    #[sea_orm(nullable)]
    pub bedrooms: Option<i32>,

    #[sea_orm(nullable)]
    pub bathrooms: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
