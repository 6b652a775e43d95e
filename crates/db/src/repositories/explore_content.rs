//! Explore content repository.

use std::sync::Arc;

use chrono::Utc;
use explore_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait,
};

use crate::entities::{ExploreContent, explore_content, explore_video};

/// Partial write of the cached analytics columns.
///
/// Only fields that are `Some` are written.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedAnalyticsUpdate {
    pub view_count: Option<i32>,
    /// Total watch time in seconds.
    pub total_watch_time: Option<i64>,
    /// Completions per view, in `[0, 1]`.
    pub completion_rate: Option<f64>,
    pub save_count: Option<i32>,
    pub share_count: Option<i32>,
    pub click_through_count: Option<i32>,
}

impl CachedAnalyticsUpdate {
    /// Whether no column would be written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.view_count.is_none()
            && self.total_watch_time.is_none()
            && self.completion_rate.is_none()
            && self.save_count.is_none()
            && self.share_count.is_none()
            && self.click_through_count.is_none()
    }
}

/// Repository for explore content operations.
#[derive(Clone)]
pub struct ExploreContentRepository {
    db: Arc<DatabaseConnection>,
}

impl ExploreContentRepository {
    /// Create a new explore content repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find content by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<explore_content::Model>> {
        ExploreContent::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every content row owned by a creator.
    pub async fn find_by_creator(&self, creator_id: &str) -> AppResult<Vec<explore_content::Model>> {
        ExploreContent::find()
            .filter(explore_content::Column::CreatorId.eq(creator_id))
            .order_by(explore_content::Column::CreatedAt, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find every content row, active or not.
    pub async fn find_all(&self) -> AppResult<Vec<explore_content::Model>> {
        ExploreContent::find()
            .order_by(explore_content::Column::Id, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find active content in feed order.
    ///
    /// Featured content first, then cached engagement score, then newest.
    pub async fn find_ranked(&self, limit: u64) -> AppResult<Vec<explore_content::Model>> {
        ExploreContent::find()
            .filter(explore_content::Column::IsActive.eq(true))
            .order_by(explore_content::Column::IsFeatured, Order::Desc)
            .order_by(explore_content::Column::EngagementScore, Order::Desc)
            .order_by(explore_content::Column::CreatedAt, Order::Desc)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a content row together with its video row.
    ///
    /// Both inserts run in one transaction, so readers see both rows or neither.
    pub async fn create_with_video(
        &self,
        content: explore_content::ActiveModel,
        video: explore_video::ActiveModel,
    ) -> AppResult<(explore_content::Model, explore_video::Model)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let content = content
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let video = video
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((content, video))
    }

    /// Write the cached engagement score of one row.
    pub async fn update_engagement_score(&self, id: &str, score: f64) -> AppResult<()> {
        let result = ExploreContent::update_many()
            .col_expr(explore_content::Column::EngagementScore, Expr::value(score))
            .col_expr(explore_content::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(explore_content::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::ContentNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Write any subset of the cached analytics columns of one row.
    pub async fn update_cached_analytics(
        &self,
        id: &str,
        update: &CachedAnalyticsUpdate,
    ) -> AppResult<()> {
        use explore_content::Column;

        let mut query = ExploreContent::update_many();
        if let Some(view_count) = update.view_count {
            query = query.col_expr(Column::ViewCount, Expr::value(view_count));
        }
        if let Some(total_watch_time) = update.total_watch_time {
            query = query.col_expr(Column::TotalWatchTime, Expr::value(total_watch_time));
        }
        if let Some(completion_rate) = update.completion_rate {
            query = query.col_expr(Column::CompletionRate, Expr::value(completion_rate));
        }
        if let Some(save_count) = update.save_count {
            query = query.col_expr(Column::SaveCount, Expr::value(save_count));
        }
        if let Some(share_count) = update.share_count {
            query = query.col_expr(Column::ShareCount, Expr::value(share_count));
        }
        if let Some(click_through_count) = update.click_through_count {
            query = query.col_expr(Column::ClickThroughCount, Expr::value(click_through_count));
        }

        let result = query
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::ContentNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Set the active flag. Deactivated content drops out of the feed.
    pub async fn set_active(&self, id: &str, is_active: bool) -> AppResult<()> {
        self.set_flag(id, explore_content::Column::IsActive, is_active)
            .await
    }

    /// Set the featured flag.
    pub async fn set_featured(&self, id: &str, is_featured: bool) -> AppResult<()> {
        self.set_flag(id, explore_content::Column::IsFeatured, is_featured)
            .await
    }

    async fn set_flag(
        &self,
        id: &str,
        column: explore_content::Column,
        value: bool,
    ) -> AppResult<()> {
        let result = ExploreContent::update_many()
            .col_expr(column, Expr::value(value))
            .col_expr(explore_content::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(explore_content::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::ContentNotFound(id.to_string()));
        }
        Ok(())
    }
}
