//! Upload broker.
//!
//! Issues time-limited write URLs for a video and its thumbnail. Clients
//! upload the bytes straight to storage and come back with the read URLs to
//! register the video.

use std::time::Duration;

use explore_common::{
    AppError, AppResult, StorageService, StorageSettings, THUMBNAIL_CONTENT_TYPE, build_storage,
    generate_upload_keys,
};
use serde::Serialize;
use tracing::{error, info};

/// Write and read locations for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTargets {
    /// Time-limited URL the video is written to.
    pub video_upload_url: String,
    /// Time-limited URL the thumbnail is written to.
    pub thumbnail_upload_url: String,
    /// Public URL the video is read from.
    pub video_url: String,
    /// Public URL the thumbnail is read from.
    pub thumbnail_url: String,
    /// Seconds until the write URLs expire.
    pub expires_in: u64,
}

/// Service issuing upload targets.
#[derive(Clone)]
pub struct UploadBroker {
    storage: Option<StorageService>,
    ttl: Duration,
}

impl UploadBroker {
    /// Create a new upload broker.
    ///
    /// Without a storage backend every request fails with a configuration error.
    #[must_use]
    pub const fn new(storage: Option<StorageService>, ttl: Duration) -> Self {
        Self { storage, ttl }
    }

    /// Create an upload broker from the storage settings.
    ///
    /// A backend that cannot be built is logged here and reported again on
    /// every request.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings, ttl: Duration) -> Self {
        let storage = match build_storage(settings) {
            Ok(storage) => Some(storage),
            Err(e) => {
                error!(error = %e, "Object storage is not usable; uploads will be rejected");
                None
            }
        };
        Self::new(storage, ttl)
    }

    /// Issue write and read URLs for a new video upload.
    pub async fn issue_upload_targets(
        &self,
        creator_id: &str,
        filename: &str,
        content_type: &str,
    ) -> AppResult<UploadTargets> {
        let storage = self.storage.as_ref().ok_or_else(|| {
            AppError::Config("object storage credentials are not configured".to_string())
        })?;

        if creator_id.trim().is_empty() {
            return Err(AppError::Validation("Creator ID is required".to_string()));
        }
        if !content_type.starts_with("video/") {
            return Err(AppError::Validation(format!(
                "Unsupported content type for video upload: {content_type}"
            )));
        }

        let keys = generate_upload_keys(creator_id, filename);

        let video_upload_url = storage
            .issue_write_url(&keys.video_key, content_type, self.ttl)
            .await?;
        let thumbnail_upload_url = storage
            .issue_write_url(&keys.thumbnail_key, THUMBNAIL_CONTENT_TYPE, self.ttl)
            .await?;

        info!(
            creator_id = %creator_id,
            video_key = %keys.video_key,
            "Issued upload targets"
        );

        Ok(UploadTargets {
            video_upload_url,
            thumbnail_upload_url,
            video_url: storage.public_read_url(&keys.video_key),
            thumbnail_url: storage.public_read_url(&keys.thumbnail_key),
            expires_in: self.ttl.as_secs(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use explore_common::{LocalSignedStorage, ObjectStorage};
    use std::sync::{Arc, Mutex};

    /// Records every write URL request.
    #[derive(Default)]
    struct RecordingStorage {
        issued: Mutex<Vec<(String, String, Duration)>>,
    }

    #[async_trait::async_trait]
    impl ObjectStorage for RecordingStorage {
        async fn issue_write_url(
            &self,
            key: &str,
            content_type: &str,
            ttl: Duration,
        ) -> AppResult<String> {
            self.issued
                .lock()
                .unwrap()
                .push((key.to_string(), content_type.to_string(), ttl));
            Ok(format!("https://upload.test/{key}?sig=x"))
        }

        fn public_read_url(&self, key: &str) -> String {
            format!("https://cdn.test/{key}")
        }
    }

    #[tokio::test]
    async fn test_issue_upload_targets() {
        let storage = Arc::new(RecordingStorage::default());
        let broker = UploadBroker::new(
            Some(storage.clone() as StorageService),
            Duration::from_secs(3600),
        );

        let targets = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap();

        assert_eq!(targets.expires_in, 3600);
        assert!(targets.video_url.starts_with("https://cdn.test/explore/user1/"));
        assert!(targets.video_url.ends_with("/video.mp4"));
        assert!(targets.thumbnail_url.ends_with("/thumbnail.jpg"));
        assert_ne!(targets.video_upload_url, targets.thumbnail_upload_url);

        let issued = storage.issued.lock().unwrap();
        assert_eq!(issued.len(), 2);
        assert_eq!(issued[0].1, "video/mp4");
        assert_eq!(issued[1].1, THUMBNAIL_CONTENT_TYPE);
        assert!(issued.iter().all(|(_, _, ttl)| *ttl == Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn test_thumbnail_type_ignores_video_type() {
        let storage = Arc::new(RecordingStorage::default());
        let broker = UploadBroker::new(
            Some(storage.clone() as StorageService),
            Duration::from_secs(60),
        );

        broker
            .issue_upload_targets("user1", "tour.webm", "video/webm")
            .await
            .unwrap();

        let issued = storage.issued.lock().unwrap();
        assert_eq!(issued[1].1, "image/jpeg");
    }

    #[tokio::test]
    async fn test_missing_storage_is_config_error() {
        let broker = UploadBroker::new(None, Duration::from_secs(3600));
        let err = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_unusable_settings_reject_every_request() {
        // Local backend without URL bases or a secret
        let broker =
            UploadBroker::from_settings(&StorageSettings::default(), Duration::from_secs(60));
        let err = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_broker_from_local_settings() {
        let settings = StorageSettings {
            upload_url: Some("https://upload.test/u".to_string()),
            public_url: Some("https://cdn.test".to_string()),
            signing_secret: Some("s3cret".to_string()),
            ..StorageSettings::default()
        };
        let broker = UploadBroker::from_settings(&settings, Duration::from_secs(900));

        let targets = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap();

        assert_eq!(targets.expires_in, 900);
        assert!(targets.video_upload_url.starts_with("https://upload.test/u/explore/user1/"));
        assert!(targets.video_url.starts_with("https://cdn.test/explore/user1/"));
    }

    #[tokio::test]
    async fn test_missing_signing_secret_is_config_error() {
        let storage: StorageService = Arc::new(LocalSignedStorage::new(
            "https://upload.test".to_string(),
            "https://cdn.test".to_string(),
            None,
        ));
        let broker = UploadBroker::new(Some(storage), Duration::from_secs(3600));

        let err = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_video_content_type() {
        let broker = UploadBroker::new(
            Some(Arc::new(RecordingStorage::default())),
            Duration::from_secs(3600),
        );
        let err = broker
            .issue_upload_targets("user1", "plan.pdf", "application/pdf")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_targets_are_unique_per_call() {
        let broker = UploadBroker::new(
            Some(Arc::new(RecordingStorage::default())),
            Duration::from_secs(3600),
        );
        let a = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap();
        let b = broker
            .issue_upload_targets("user1", "tour.mp4", "video/mp4")
            .await
            .unwrap();

        assert_ne!(a.video_url, b.video_url);
    }
}
