//! Explore video repository.

use std::sync::Arc;

use chrono::Utc;
use explore_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder};

use crate::entities::{ExploreVideo, explore_video};

/// Repository for explore video operations.
#[derive(Clone)]
pub struct ExploreVideoRepository {
    db: Arc<DatabaseConnection>,
}

impl ExploreVideoRepository {
    /// Create a new explore video repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find video by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<explore_video::Model>> {
        ExploreVideo::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the video row of a content row.
    pub async fn find_by_content(&self, content_id: &str) -> AppResult<Option<explore_video::Model>> {
        ExploreVideo::find()
            .filter(explore_video::Column::ContentId.eq(content_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every video.
    pub async fn find_all(&self) -> AppResult<Vec<explore_video::Model>> {
        ExploreVideo::find()
            .order_by(explore_video::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write the cached completion rate and view count of one video.
    pub async fn update_completion(
        &self,
        id: &str,
        completion_rate: f64,
        view_count: i32,
    ) -> AppResult<()> {
        let result = ExploreVideo::update_many()
            .col_expr(
                explore_video::Column::CompletionRate,
                Expr::value(completion_rate),
            )
            .col_expr(explore_video::Column::ViewCount, Expr::value(view_count))
            .col_expr(explore_video::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(explore_video::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::VideoNotFound(id.to_string()));
        }
        Ok(())
    }
}
