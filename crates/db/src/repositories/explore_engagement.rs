//! Explore engagement event repository.
//!
//! Events are written by the engagement recorder; this repository only reads.

use std::sync::Arc;

use explore_common::{AppError, AppResult, DateWindow};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Select,
};

use crate::entities::{ExploreEngagement, explore_engagement};

/// Repository for explore engagement reads.
#[derive(Clone)]
pub struct ExploreEngagementRepository {
    db: Arc<DatabaseConnection>,
}

impl ExploreEngagementRepository {
    /// Create a new explore engagement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the events recorded against a content row inside a window.
    pub async fn find_by_content(
        &self,
        content_id: &str,
        window: &DateWindow,
    ) -> AppResult<Vec<explore_engagement::Model>> {
        let query =
            ExploreEngagement::find().filter(explore_engagement::Column::ContentId.eq(content_id));

        within(query, window)
            .order_by(explore_engagement::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the events recorded during a feed session inside a window.
    pub async fn find_by_session(
        &self,
        session_id: &str,
        window: &DateWindow,
    ) -> AppResult<Vec<explore_engagement::Model>> {
        let query =
            ExploreEngagement::find().filter(explore_engagement::Column::SessionId.eq(session_id));

        within(query, window)
            .order_by(explore_engagement::Column::CreatedAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn within(
    mut query: Select<ExploreEngagement>,
    window: &DateWindow,
) -> Select<ExploreEngagement> {
    if let Some(start) = window.start {
        query = query.filter(explore_engagement::Column::CreatedAt.gte(start));
    }
    if let Some(end) = window.end {
        query = query.filter(explore_engagement::Column::CreatedAt.lte(end));
    }
    query
}
