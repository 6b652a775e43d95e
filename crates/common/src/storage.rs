//! Object storage capability for video and thumbnail uploads.
//!
//! The engine never moves bytes itself. A backend issues time-limited write
//! URLs that clients upload to directly, and derives stable public read URLs
//! from the same keys.

use std::sync::Arc;
use std::time::Duration;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::Url;

use crate::config::{StorageKind, StorageSettings};
use crate::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

/// Content type used for every thumbnail, whatever the video's type.
pub const THUMBNAIL_CONTENT_TYPE: &str = "image/jpeg";

/// Storage backend trait.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Issue a URL that permits writing `key` with `content_type` until `ttl` elapses.
    async fn issue_write_url(&self, key: &str, content_type: &str, ttl: Duration)
    -> AppResult<String>;

    /// Get the public URL for a key.
    fn public_read_url(&self, key: &str) -> String;
}

/// Shared handle to a storage backend.
pub type StorageService = Arc<dyn ObjectStorage>;

/// Storage backend that signs upload URLs for the application's own upload endpoint.
pub struct LocalSignedStorage {
    upload_url: String,
    public_url: String,
    secret: Option<String>,
}

impl LocalSignedStorage {
    /// Create a new locally signing backend.
    ///
    /// A missing secret is accepted here and reported when a URL is requested.
    #[must_use]
    pub const fn new(upload_url: String, public_url: String, secret: Option<String>) -> Self {
        Self {
            upload_url,
            public_url,
            secret,
        }
    }

    fn mac(&self) -> AppResult<HmacSha256> {
        let secret = self
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("storage signing secret is not configured".to_string()))?;
        HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid storage signing secret: {e}")))
    }

    /// Compute the hex signature for an upload of `key` expiring at `expires_at` (unix seconds).
    pub fn sign(&self, key: &str, content_type: &str, expires_at: i64) -> AppResult<String> {
        let mut mac = self.mac()?;
        mac.update(signing_payload(key, content_type, expires_at).as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Check an upload signature presented to the upload endpoint.
    ///
    /// Expired or malformed signatures are rejected.
    pub fn verify(
        &self,
        key: &str,
        content_type: &str,
        expires_at: i64,
        signature: &str,
        now: i64,
    ) -> AppResult<bool> {
        if now > expires_at {
            return Ok(false);
        }
        let Ok(expected) = hex::decode(signature) else {
            return Ok(false);
        };
        let mut mac = self.mac()?;
        mac.update(signing_payload(key, content_type, expires_at).as_bytes());
        Ok(mac.verify_slice(&expected).is_ok())
    }
}

fn signing_payload(key: &str, content_type: &str, expires_at: i64) -> String {
    format!("{key}\n{content_type}\n{expires_at}")
}

#[async_trait::async_trait]
impl ObjectStorage for LocalSignedStorage {
    async fn issue_write_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> AppResult<String> {
        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| AppError::Config("upload URL ttl is too large".to_string()))?;
        let expires_at = chrono::Utc::now().timestamp() + ttl_secs;
        let signature = self.sign(key, content_type, expires_at)?;

        let mut url = Url::parse(&format!("{}/{}", self.upload_url.trim_end_matches('/'), key))
            .map_err(|e| AppError::Config(format!("invalid upload URL base: {e}")))?;
        url.query_pairs_mut()
            .append_pair("expires", &expires_at.to_string())
            .append_pair("contentType", content_type)
            .append_pair("signature", &signature);

        Ok(url.into())
    }

    fn public_read_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url.trim_end_matches('/'), key)
    }
}

/// S3-compatible object storage backend issuing presigned PUT URLs.
#[cfg(feature = "s3")]
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: Option<String>,
    prefix: Option<String>,
}

#[cfg(feature = "s3")]
impl S3Storage {
    /// Create a new S3 storage backend.
    #[must_use]
    pub fn new(
        endpoint: Option<&str>,
        bucket: String,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
        public_url: Option<String>,
        prefix: Option<String>,
    ) -> Self {
        use aws_config::Region;
        use aws_sdk_s3::config::Credentials;

        let credentials =
            Credentials::new(access_key_id, secret_access_key, None, None, "explore");

        let mut builder = aws_sdk_s3::Config::builder()
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .force_path_style(true);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket,
            public_url,
            prefix,
        }
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), key),
            None => key.to_string(),
        }
    }
}

#[cfg(feature = "s3")]
#[async_trait::async_trait]
impl ObjectStorage for S3Storage {
    async fn issue_write_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> AppResult<String> {
        use aws_sdk_s3::presigning::PresigningConfig;

        let presigning = PresigningConfig::expires_in(ttl)
            .map_err(|e| AppError::Config(format!("invalid presigning window: {e}")))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("S3 presign failed: {e}")))?;

        Ok(request.uri().to_string())
    }

    fn public_read_url(&self, key: &str) -> String {
        let full_key = self.full_key(key);
        match &self.public_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), full_key),
            None => format!("https://{}.s3.amazonaws.com/{}", self.bucket, full_key),
        }
    }
}

/// Build the configured storage backend.
///
/// Fails with a configuration error when the backend's credentials are absent.
pub fn build_storage(settings: &StorageSettings) -> AppResult<StorageService> {
    match settings.kind {
        StorageKind::Local => {
            let secret = settings
                .signing_secret
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    AppError::Config("storage.signing_secret is required for local storage".to_string())
                })?;
            let upload_url = absolute_base(settings.upload_url.as_deref(), "storage.upload_url")?;
            let public_url = absolute_base(settings.public_url.as_deref(), "storage.public_url")?;
            Ok(Arc::new(LocalSignedStorage::new(
                upload_url,
                public_url,
                Some(secret),
            )))
        }
        StorageKind::S3 => build_s3(settings),
    }
}

/// Local URLs are joined onto these bases, so both must be absolute.
fn absolute_base(value: Option<&str>, name: &str) -> AppResult<String> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Config(format!("{name} is required for local storage")))?;
    Url::parse(value)
        .map_err(|e| AppError::Config(format!("{name} is not an absolute URL: {e}")))?;
    Ok(value.to_string())
}

#[cfg(feature = "s3")]
fn build_s3(settings: &StorageSettings) -> AppResult<StorageService> {
    let (Some(access_key_id), Some(secret_access_key)) = (
        settings.access_key_id.as_deref(),
        settings.secret_access_key.as_deref(),
    ) else {
        return Err(AppError::Config("S3 access credentials are not configured".to_string()));
    };
    let bucket = settings
        .bucket
        .clone()
        .ok_or_else(|| AppError::Config("storage.bucket is required for S3".to_string()))?;
    let region = settings.region.as_deref().unwrap_or("us-east-1");

    Ok(Arc::new(S3Storage::new(
        settings.endpoint.as_deref(),
        bucket,
        region,
        access_key_id,
        secret_access_key,
        settings.public_url.clone(),
        settings.prefix.clone(),
    )))
}

#[cfg(not(feature = "s3"))]
fn build_s3(_settings: &StorageSettings) -> AppResult<StorageService> {
    Err(AppError::Config(
        "S3 storage requested but this build lacks the `s3` feature".to_string(),
    ))
}

/// Storage keys reserved for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadKeys {
    /// Key of the raw video object.
    pub video_key: String,
    /// Key of the companion thumbnail image.
    pub thumbnail_key: String,
}

/// Generate the video and thumbnail keys for a new upload.
///
/// Both keys share a `explore/{creator}/{millis}_{uuid}` namespace.
#[must_use]
pub fn generate_upload_keys(creator_id: &str, original_name: &str) -> UploadKeys {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let creator: String = creator_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    // Extract extension from original name
    let extension = original_name
        .rfind('.')
        .filter(|&pos| pos > 0 && pos < original_name.len() - 1)
        .map(|pos| &original_name[pos + 1..])
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase);

    let namespace = format!("explore/{creator}/{timestamp}_{}", uuid::Uuid::new_v4().simple());

    UploadKeys {
        video_key: format!("{namespace}/video.{extension}"),
        thumbnail_key: format!("{namespace}/thumbnail.jpg"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn storage() -> LocalSignedStorage {
        LocalSignedStorage::new(
            "https://upload.example.com/u".to_string(),
            "https://cdn.example.com/files/".to_string(),
            Some("s3cr3t".to_string()),
        )
    }

    #[test]
    fn test_generate_upload_keys() {
        let keys = generate_upload_keys("user123", "tour.MP4");
        assert!(keys.video_key.starts_with("explore/user123/"));
        assert!(keys.video_key.ends_with("/video.mp4"));
        assert!(keys.thumbnail_key.ends_with("/thumbnail.jpg"));
        assert_ne!(keys.video_key, keys.thumbnail_key);

        let video_ns = keys.video_key.rsplit_once('/').unwrap().0;
        let thumb_ns = keys.thumbnail_key.rsplit_once('/').unwrap().0;
        assert_eq!(video_ns, thumb_ns);
    }

    #[test]
    fn test_generate_upload_keys_is_collision_resistant() {
        let a = generate_upload_keys("user123", "tour.mp4");
        let b = generate_upload_keys("user123", "tour.mp4");
        assert_ne!(a.video_key, b.video_key);
    }

    #[test]
    fn test_generate_upload_keys_no_extension() {
        let keys = generate_upload_keys("user/../x", "clip");
        assert!(keys.video_key.ends_with("/video.bin"));
        assert!(keys.video_key.starts_with("explore/user____x/"));
    }

    #[test]
    fn test_public_read_url_is_deterministic() {
        let storage = storage();
        assert_eq!(
            storage.public_read_url("explore/u/1_a/video.mp4"),
            "https://cdn.example.com/files/explore/u/1_a/video.mp4"
        );
        assert_eq!(
            storage.public_read_url("explore/u/1_a/video.mp4"),
            storage.public_read_url("explore/u/1_a/video.mp4")
        );
    }

    #[test]
    fn test_sign_and_verify() {
        let storage = storage();
        let sig = storage.sign("k", "video/mp4", 1_000).unwrap();

        assert!(storage.verify("k", "video/mp4", 1_000, &sig, 999).unwrap());
        assert!(!storage.verify("k", "video/mp4", 1_000, &sig, 1_001).unwrap());
        assert!(!storage.verify("k", "image/jpeg", 1_000, &sig, 999).unwrap());
        assert!(!storage.verify("k", "video/mp4", 1_000, "zz", 999).unwrap());
    }

    #[tokio::test]
    async fn test_issue_write_url_carries_signature() {
        let storage = storage();
        let url = storage
            .issue_write_url("explore/u/1_a/video.mp4", "video/mp4", Duration::from_secs(3600))
            .await
            .unwrap();

        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.path(), "/u/explore/u/1_a/video.mp4");
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.iter().any(|(k, v)| k == "contentType" && v == "video/mp4"));
        assert!(pairs.iter().any(|(k, _)| k == "signature"));
        assert!(pairs.iter().any(|(k, _)| k == "expires"));
    }

    #[tokio::test]
    async fn test_missing_secret_is_config_error() {
        let storage = LocalSignedStorage::new("https://u".to_string(), "https://c".to_string(), None);
        let err = storage
            .issue_write_url("k", "video/mp4", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_build_storage_requires_secret() {
        let settings = StorageSettings::default();
        assert!(matches!(build_storage(&settings), Err(AppError::Config(_))));

        let settings = StorageSettings {
            signing_secret: Some("secret".to_string()),
            upload_url: Some("https://upload.example.com".to_string()),
            public_url: Some("https://cdn.example.com".to_string()),
            ..StorageSettings::default()
        };
        assert!(build_storage(&settings).is_ok());
    }

    #[test]
    fn test_build_storage_requires_url_bases() {
        let settings = StorageSettings {
            signing_secret: Some("secret".to_string()),
            ..StorageSettings::default()
        };
        let err = build_storage(&settings).err().unwrap();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("storage.upload_url")));

        let settings = StorageSettings {
            signing_secret: Some("secret".to_string()),
            upload_url: Some("https://upload.example.com".to_string()),
            ..StorageSettings::default()
        };
        let err = build_storage(&settings).err().unwrap();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("storage.public_url")));
    }

    #[test]
    fn test_build_storage_rejects_relative_bases() {
        let settings = StorageSettings {
            signing_secret: Some("secret".to_string()),
            upload_url: Some("/uploads".to_string()),
            public_url: Some("https://cdn.example.com".to_string()),
            ..StorageSettings::default()
        };
        assert!(matches!(build_storage(&settings), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_built_local_storage_issues_urls() {
        let settings = StorageSettings {
            signing_secret: Some("secret".to_string()),
            upload_url: Some("https://upload.example.com/u".to_string()),
            public_url: Some("https://cdn.example.com".to_string()),
            ..StorageSettings::default()
        };
        let storage = build_storage(&settings).unwrap();

        let url = storage
            .issue_write_url("explore/u/1_a/video.mp4", "video/mp4", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(url.starts_with("https://upload.example.com/u/explore/u/1_a/video.mp4?"));
        assert_eq!(
            storage.public_read_url("explore/u/1_a/video.mp4"),
            "https://cdn.example.com/explore/u/1_a/video.mp4"
        );
    }
}
