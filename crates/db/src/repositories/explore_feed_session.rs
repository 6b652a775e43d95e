//! Explore feed session repository.

use std::sync::Arc;

use explore_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entities::{ExploreFeedSession, explore_feed_session};

/// Repository for feed session reads.
#[derive(Clone)]
pub struct ExploreFeedSessionRepository {
    db: Arc<DatabaseConnection>,
}

impl ExploreFeedSessionRepository {
    /// Create a new feed session repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find session by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<explore_feed_session::Model>> {
        ExploreFeedSession::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_open_session() {
        let session = explore_feed_session::Model {
            id: "s1".to_string(),
            user_id: None,
            session_start: Utc::now().into(),
            session_end: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[session]])
                .into_connection(),
        );

        let repo = ExploreFeedSessionRepository::new(db);
        let found = repo.find_by_id("s1").await.unwrap().unwrap();

        assert!(found.session_end.is_none());
    }
}
