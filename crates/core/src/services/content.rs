//! Content registration and cached-analytics maintenance.

use chrono::Utc;
use explore_common::{AppError, AppResult, IdGenerator};
use explore_db::entities::{explore_content, explore_video};
use explore_db::repositories::{
    CachedAnalyticsUpdate, ExploreContentRepository, ReferenceRepository,
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::services::affiliation::AffiliationResolver;
use crate::services::validation::{VideoMetadata, validate_duration, validate_metadata};

/// Maximum feed page size.
const MAX_FEED_LIMIT: u64 = 100;

/// Identifiers and URLs of a freshly registered video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredVideo {
    pub content_id: String,
    pub video_id: String,
    pub video_url: String,
    pub thumbnail_url: String,
}

/// Direct patch of cached analytics. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsPatch {
    #[validate(range(min = 0))]
    pub view_count: Option<i32>,
    #[validate(range(min = 0))]
    pub total_watch_time: Option<i64>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub completion_rate: Option<f64>,
    #[validate(range(min = 0))]
    pub save_count: Option<i32>,
    #[validate(range(min = 0))]
    pub share_count: Option<i32>,
    #[validate(range(min = 0))]
    pub click_through_count: Option<i32>,
}

impl From<AnalyticsPatch> for CachedAnalyticsUpdate {
    fn from(patch: AnalyticsPatch) -> Self {
        Self {
            view_count: patch.view_count,
            total_watch_time: patch.total_watch_time,
            completion_rate: patch.completion_rate,
            save_count: patch.save_count,
            share_count: patch.share_count,
            click_through_count: patch.click_through_count,
        }
    }
}

/// Location, price and facts copied from the showcased subject.
#[derive(Debug, Clone, PartialEq)]
struct SubjectFacts {
    latitude: Option<f64>,
    longitude: Option<f64>,
    price_min: Option<i64>,
    price_max: Option<i64>,
    metadata: serde_json::Value,
}

/// Service registering Explore content.
#[derive(Clone)]
pub struct ContentService {
    content_repo: ExploreContentRepository,
    reference_repo: ReferenceRepository,
    affiliation: AffiliationResolver,
    id_gen: IdGenerator,
}

impl ContentService {
    /// Create a new content service.
    #[must_use]
    pub const fn new(
        content_repo: ExploreContentRepository,
        reference_repo: ReferenceRepository,
        affiliation: AffiliationResolver,
    ) -> Self {
        Self {
            content_repo,
            reference_repo,
            affiliation,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register an uploaded video.
    ///
    /// Metadata violations are reported together with a duration violation,
    /// if any. A valid request then needs its property or development to exist.
    pub async fn register_video(
        &self,
        creator_id: &str,
        video_url: String,
        thumbnail_url: String,
        metadata: VideoMetadata,
        duration_secs: f64,
    ) -> AppResult<RegisteredVideo> {
        let metadata_report = validate_metadata(&metadata);
        let duration_report = validate_duration(duration_secs);

        if !metadata_report.valid {
            let mut violations = metadata_report.errors;
            violations.extend(duration_report.errors);
            return Err(AppError::InvalidMetadata(violations));
        }
        if let Some(message) = duration_report.message() {
            return Err(AppError::InvalidDuration(message.to_string()));
        }

        let facts = self.resolve_subject(&metadata).await?;
        let affiliation = self.affiliation.resolve(creator_id).await;

        let now = Utc::now();
        let content_id = self.id_gen.generate();
        let video_id = self.id_gen.generate();

        let content = explore_content::ActiveModel {
            id: Set(content_id.clone()),
            creator_id: Set(creator_id.to_string()),
            creator_type: Set(affiliation.creator_type),
            agency_id: Set(affiliation.agency_id),
            property_id: Set(metadata.property_id),
            development_id: Set(metadata.development_id),
            title: Set(metadata.title.trim().to_string()),
            description: Set(metadata.description),
            tags: Set(json!(metadata.tags)),
            lifestyle_categories: Set(json!(metadata.lifestyle_categories)),
            latitude: Set(facts.latitude),
            longitude: Set(facts.longitude),
            price_min: Set(facts.price_min),
            price_max: Set(facts.price_max),
            metadata: Set(facts.metadata),
            video_url: Set(video_url.clone()),
            thumbnail_url: Set(thumbnail_url.clone()),
            duration_seconds: Set(duration_secs),
            view_count: Set(0),
            total_watch_time: Set(0),
            completion_rate: Set(0.0),
            save_count: Set(0),
            share_count: Set(0),
            click_through_count: Set(0),
            engagement_score: Set(0.0),
            is_active: Set(true),
            is_featured: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let video = explore_video::ActiveModel {
            id: Set(video_id.clone()),
            content_id: Set(content_id.clone()),
            creator_id: Set(creator_id.to_string()),
            title: Set(metadata.title.trim().to_string()),
            video_url: Set(video_url.clone()),
            thumbnail_url: Set(thumbnail_url.clone()),
            duration_seconds: Set(duration_secs),
            view_count: Set(0),
            completion_rate: Set(0.0),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        let (content, video) = self.content_repo.create_with_video(content, video).await?;

        info!(
            content_id = %content.id,
            video_id = %video.id,
            creator_id = %creator_id,
            "Registered explore video"
        );

        Ok(RegisteredVideo {
            content_id: content.id,
            video_id: video.id,
            video_url,
            thumbnail_url,
        })
    }

    /// Every referenced subject must exist. Facts come from the property
    /// when one is linked, otherwise from the development.
    async fn resolve_subject(&self, metadata: &VideoMetadata) -> AppResult<SubjectFacts> {
        let property = match metadata.property_id.as_deref() {
            Some(id) => Some(
                self.reference_repo
                    .find_property(id)
                    .await?
                    .ok_or_else(|| AppError::ReferenceNotFound(format!("Property not found: {id}")))?,
            ),
            None => None,
        };

        let development = match metadata.development_id.as_deref() {
            Some(id) => Some(
                self.reference_repo
                    .find_development(id)
                    .await?
                    .ok_or_else(|| {
                        AppError::ReferenceNotFound(format!("Development not found: {id}"))
                    })?,
            ),
            None => None,
        };

        match (property, development) {
            (Some(property), _) => Ok(SubjectFacts {
                latitude: property.latitude,
                longitude: property.longitude,
                price_min: property.price,
                price_max: property.price,
                metadata: json!({
                    "bedrooms": property.bedrooms,
                    "bathrooms": property.bathrooms,
                }),
            }),
            (None, Some(development)) => Ok(SubjectFacts {
                latitude: development.latitude,
                longitude: development.longitude,
                price_min: development.price_from,
                price_max: development.price_to,
                metadata: json!({}),
            }),
            (None, None) => Err(AppError::InvalidMetadata(vec![
                "Video must be linked to a property or development".to_string(),
            ])),
        }
    }

    /// Patch the cached analytics of a content row.
    ///
    /// An empty patch writes nothing but still checks the row exists.
    pub async fn update_analytics(&self, content_id: &str, patch: AnalyticsPatch) -> AppResult<()> {
        patch.validate()?;
        if patch.completion_rate.is_some_and(|rate| !rate.is_finite()) {
            return Err(AppError::Validation(
                "completionRate must be a finite number".to_string(),
            ));
        }

        let update = CachedAnalyticsUpdate::from(patch);
        if update.is_empty() {
            return self
                .content_repo
                .find_by_id(content_id)
                .await?
                .map(|_| ())
                .ok_or_else(|| AppError::ContentNotFound(content_id.to_string()));
        }

        self.content_repo
            .update_cached_analytics(content_id, &update)
            .await
    }

    /// Activate or soft-deactivate content.
    pub async fn set_active(&self, content_id: &str, is_active: bool) -> AppResult<()> {
        self.content_repo.set_active(content_id, is_active).await?;
        info!(content_id = %content_id, is_active, "Updated content active flag");
        Ok(())
    }

    /// Feature or unfeature content.
    pub async fn set_featured(&self, content_id: &str, is_featured: bool) -> AppResult<()> {
        self.content_repo.set_featured(content_id, is_featured).await?;
        info!(content_id = %content_id, is_featured, "Updated content featured flag");
        Ok(())
    }

    /// Active content in feed order, using the cached scores.
    pub async fn ranked_feed(&self, limit: u64) -> AppResult<Vec<explore_content::Model>> {
        self.content_repo
            .find_ranked(limit.clamp(1, MAX_FEED_LIMIT))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use explore_db::entities::explore_content::CreatorType;
    use explore_db::entities::{agent, developer, development, property};
    use explore_db::repositories::AffiliationRepository;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Transaction};
    use std::sync::Arc;

    fn service(db: DatabaseConnection) -> ContentService {
        let db = Arc::new(db);
        ContentService::new(
            ExploreContentRepository::new(Arc::clone(&db)),
            ReferenceRepository::new(Arc::clone(&db)),
            AffiliationResolver::new(AffiliationRepository::new(db)),
        )
    }

    fn metadata() -> VideoMetadata {
        VideoMetadata {
            title: "Garden cottage walkthrough".to_string(),
            description: Some("Two minutes from the beach".to_string()),
            tags: vec!["garden".to_string()],
            lifestyle_categories: vec!["family".to_string()],
            property_id: Some("prop1".to_string()),
            development_id: None,
        }
    }

    fn test_property() -> property::Model {
        property::Model {
            id: "prop1".to_string(),
            latitude: Some(-33.9),
            longitude: Some(18.4),
            price: Some(1_950_000),
            bedrooms: Some(2),
            bathrooms: None,
        }
    }

    fn stored_content(id: &str) -> explore_content::Model {
        explore_content::Model {
            id: id.to_string(),
            creator_id: "user1".to_string(),
            creator_type: CreatorType::User,
            agency_id: None,
            property_id: Some("prop1".to_string()),
            development_id: None,
            title: "Garden cottage walkthrough".to_string(),
            description: None,
            tags: json!(["garden"]),
            lifestyle_categories: json!(["family"]),
            latitude: Some(-33.9),
            longitude: Some(18.4),
            price_min: Some(1_950_000),
            price_max: Some(1_950_000),
            metadata: json!({"bedrooms": 2, "bathrooms": null}),
            video_url: "https://cdn.test/v.mp4".to_string(),
            thumbnail_url: "https://cdn.test/t.jpg".to_string(),
            duration_seconds: 30.0,
            view_count: 0,
            total_watch_time: 0,
            completion_rate: 0.0,
            save_count: 0,
            share_count: 0,
            click_through_count: 0,
            engagement_score: 0.0,
            is_active: true,
            is_featured: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn stored_video(id: &str, content_id: &str) -> explore_video::Model {
        explore_video::Model {
            id: id.to_string(),
            content_id: content_id.to_string(),
            creator_id: "user1".to_string(),
            title: "Garden cottage walkthrough".to_string(),
            video_url: "https://cdn.test/v.mp4".to_string(),
            thumbnail_url: "https://cdn.test/t.jpg".to_string(),
            duration_seconds: 30.0,
            view_count: 0,
            completion_rate: 0.0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_register_video() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_property()]])
            .append_query_results([Vec::<agent::Model>::new()])
            .append_query_results([Vec::<developer::Model>::new()])
            .append_query_results([[stored_content("c1")]])
            .append_query_results([[stored_video("v1", "c1")]])
            .into_connection();

        let service = service(db);
        let registered = service
            .register_video(
                "user1",
                "https://cdn.test/v.mp4".to_string(),
                "https://cdn.test/t.jpg".to_string(),
                metadata(),
                30.0,
            )
            .await
            .unwrap();

        assert_eq!(registered.content_id, "c1");
        assert_eq!(registered.video_id, "v1");
        assert_eq!(registered.video_url, "https://cdn.test/v.mp4");
    }

    #[tokio::test]
    async fn test_register_video_runs_inserts_in_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_property()]])
            .append_query_results([Vec::<agent::Model>::new()])
            .append_query_results([Vec::<developer::Model>::new()])
            .append_query_results([[stored_content("c1")]])
            .append_query_results([[stored_video("v1", "c1")]])
            .into_connection();
        let db = Arc::new(db);

        let service = ContentService::new(
            ExploreContentRepository::new(Arc::clone(&db)),
            ReferenceRepository::new(Arc::clone(&db)),
            AffiliationResolver::new(AffiliationRepository::new(Arc::clone(&db))),
        );
        service
            .register_video(
                "user1",
                "https://cdn.test/v.mp4".to_string(),
                "https://cdn.test/t.jpg".to_string(),
                metadata(),
                30.0,
            )
            .await
            .unwrap();
        drop(service);

        let db = Arc::try_unwrap(db).unwrap();
        let log: Vec<Transaction> = db.into_transaction_log();
        // property, agent, developer lookups, then the insert transaction
        assert_eq!(log.len(), 4);
        let insert_txn = format!("{:?}", log[3]);
        assert!(insert_txn.contains("explore_content"));
        assert!(insert_txn.contains("explore_video"));
    }

    #[tokio::test]
    async fn test_register_video_without_subject() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = service
            .register_video(
                "user1",
                "v".to_string(),
                "t".to_string(),
                VideoMetadata {
                    property_id: None,
                    development_id: None,
                    ..metadata()
                },
                30.0,
            )
            .await
            .unwrap_err();

        match err {
            AppError::InvalidMetadata(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations[0].contains("property or development"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_video_surfaces_both_validators() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = service
            .register_video(
                "user1",
                "v".to_string(),
                "t".to_string(),
                VideoMetadata {
                    title: String::new(),
                    ..metadata()
                },
                5.0,
            )
            .await
            .unwrap_err();

        let violations = err.violations();
        assert!(matches!(err, AppError::InvalidMetadata(_)));
        assert_eq!(violations.len(), 2);
        assert!(violations[1].contains("at least 8 seconds"));
    }

    #[tokio::test]
    async fn test_register_video_invalid_duration() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = service
            .register_video("user1", "v".to_string(), "t".to_string(), metadata(), 61.0)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidDuration(ref m) if m.contains("60 seconds")));
    }

    #[tokio::test]
    async fn test_register_video_missing_property() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<property::Model>::new()])
            .into_connection();

        let err = service(db)
            .register_video("user1", "v".to_string(), "t".to_string(), metadata(), 30.0)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ReferenceNotFound(_)));
    }

    #[tokio::test]
    async fn test_development_facts() {
        let development = development::Model {
            id: "dev1".to_string(),
            latitude: None,
            longitude: Some(28.0),
            price_from: Some(900_000),
            price_to: Some(3_200_000),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[development]])
            .into_connection();

        let facts = service(db)
            .resolve_subject(&VideoMetadata {
                property_id: None,
                development_id: Some("dev1".to_string()),
                ..metadata()
            })
            .await
            .unwrap();

        assert_eq!(facts.latitude, None);
        assert_eq!(facts.longitude, Some(28.0));
        assert_eq!(facts.price_min, Some(900_000));
        assert_eq!(facts.price_max, Some(3_200_000));
    }

    #[tokio::test]
    async fn test_property_facts_use_single_price() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_property()]])
            .into_connection();

        let facts = service(db).resolve_subject(&metadata()).await.unwrap();

        assert_eq!(facts.price_min, Some(1_950_000));
        assert_eq!(facts.price_max, Some(1_950_000));
        assert_eq!(facts.metadata["bedrooms"], json!(2));
        assert!(facts.metadata["bathrooms"].is_null());
    }

    #[tokio::test]
    async fn test_update_analytics_rejects_negative_counts() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = service
            .update_analytics(
                "c1",
                AnalyticsPatch {
                    view_count: Some(-1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_analytics_rejects_rate_above_one() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = service
            .update_analytics(
                "c1",
                AnalyticsPatch {
                    completion_rate: Some(1.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_analytics_writes_patch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let result = service(db)
            .update_analytics(
                "c1",
                AnalyticsPatch {
                    view_count: Some(40),
                    completion_rate: Some(0.25),
                    ..Default::default()
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_patch_checks_existence() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<explore_content::Model>::new()])
            .into_connection();

        let err = service(db)
            .update_analytics("missing", AnalyticsPatch::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ContentNotFound(_)));
    }

    #[tokio::test]
    async fn test_set_active_missing_content() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = service(db).set_active("missing", false).await.unwrap_err();
        assert!(matches!(err, AppError::ContentNotFound(_)));
    }

    #[tokio::test]
    async fn test_ranked_feed() {
        let mut featured = stored_content("c2");
        featured.is_featured = true;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[featured, stored_content("c1")]])
            .into_connection();

        let feed = service(db).ranked_feed(500).await.unwrap();

        assert_eq!(feed.len(), 2);
        assert!(feed[0].is_featured);
    }
}
