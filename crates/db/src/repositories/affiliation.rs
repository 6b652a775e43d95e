//! Read-only lookups of a user's professional profiles.

use std::sync::Arc;

use explore_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::entities::{Agent, Developer, agent, developer};

/// Repository for agent and developer profile lookups.
#[derive(Clone)]
pub struct AffiliationRepository {
    db: Arc<DatabaseConnection>,
}

impl AffiliationRepository {
    /// Create a new affiliation repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the agent profile of a user.
    pub async fn find_agent_by_user(&self, user_id: &str) -> AppResult<Option<agent::Model>> {
        Agent::find()
            .filter(agent::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the developer profile of a user.
    pub async fn find_developer_by_user(
        &self,
        user_id: &str,
    ) -> AppResult<Option<developer::Model>> {
        Developer::find()
            .filter(developer::Column::UserId.eq(user_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_agent_by_user() {
        let agent = agent::Model {
            id: "a1".to_string(),
            user_id: "user1".to_string(),
            agency_id: Some("agency1".to_string()),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[agent]])
                .append_query_results([Vec::<developer::Model>::new()])
                .into_connection(),
        );

        let repo = AffiliationRepository::new(db);

        let found = repo.find_agent_by_user("user1").await.unwrap().unwrap();
        assert_eq!(found.agency_id.as_deref(), Some("agency1"));

        assert!(repo.find_developer_by_user("user1").await.unwrap().is_none());
    }
}
