//! Read-only lookups of the marketplace rows a video can showcase.

use std::sync::Arc;

use explore_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entities::{Development, Property, development, property};

/// Repository for property and development reference rows.
#[derive(Clone)]
pub struct ReferenceRepository {
    db: Arc<DatabaseConnection>,
}

impl ReferenceRepository {
    /// Create a new reference repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find property by ID.
    pub async fn find_property(&self, id: &str) -> AppResult<Option<property::Model>> {
        Property::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find development by ID.
    pub async fn find_development(&self, id: &str) -> AppResult<Option<development::Model>> {
        Development::find_by_id(id)
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
    async fn test_find_property_and_missing_development() {
        let property = property::Model {
            id: "p1".to_string(),
            latitude: Some(-33.92),
            longitude: Some(18.42),
            price: Some(2_450_000),
            bedrooms: Some(3),
            bathrooms: Some(2),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[property]])
                .append_query_results([Vec::<development::Model>::new()])
                .into_connection(),
        );

        let repo = ReferenceRepository::new(db);

        let found = repo.find_property("p1").await.unwrap().unwrap();
        assert_eq!(found.price, Some(2_450_000));

        assert!(repo.find_development("d404").await.unwrap().is_none());
    }
}
