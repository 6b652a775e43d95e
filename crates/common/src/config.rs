//! Application configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Explore engine configuration.
    #[serde(default)]
    pub explore: ExploreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Which object storage backend issues upload URLs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Locally signed URLs served by the application's own upload endpoint.
    #[default]
    Local,
    /// S3-compatible presigned URLs.
    S3,
}

/// Object storage settings.
///
/// Credentials are optional here so that a deployment without them can still
/// boot; the upload broker reports the gap as a configuration error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// Backend kind.
    #[serde(default)]
    pub kind: StorageKind,
    /// Public base URL that read URLs are derived from.
    #[serde(default)]
    pub public_url: Option<String>,
    /// Base URL of the upload endpoint (local backend).
    #[serde(default)]
    pub upload_url: Option<String>,
    /// Secret used to sign upload URLs (local backend).
    #[serde(default)]
    pub signing_secret: Option<String>,
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: Option<String>,
    /// S3 region.
    #[serde(default)]
    pub region: Option<String>,
    /// S3 access key ID.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Key prefix within the bucket.
    #[serde(default)]
    pub prefix: Option<String>,
}

/// Explore engine tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct ExploreConfig {
    /// Validity window of issued upload URLs, in seconds.
    #[serde(default = "default_upload_url_ttl_secs")]
    pub upload_url_ttl_secs: u64,
    /// Number of rows a sweep processes concurrently.
    #[serde(default = "default_sweep_concurrency")]
    pub sweep_concurrency: usize,
    /// Interval between engagement-score sweeps, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub score_sweep_interval_secs: u64,
    /// Interval between completion-rate sweeps, in seconds.
    #[serde(default = "default_sweep_interval_secs")]
    pub completion_sweep_interval_secs: u64,
    /// Whether both sweeps run once immediately at startup.
    #[serde(default = "default_true")]
    pub sweep_on_startup: bool,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            upload_url_ttl_secs: default_upload_url_ttl_secs(),
            sweep_concurrency: default_sweep_concurrency(),
            score_sweep_interval_secs: default_sweep_interval_secs(),
            completion_sweep_interval_secs: default_sweep_interval_secs(),
            sweep_on_startup: true,
        }
    }
}

impl ExploreConfig {
    /// Upload URL validity window.
    #[must_use]
    pub const fn upload_url_ttl(&self) -> Duration {
        Duration::from_secs(self.upload_url_ttl_secs)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON formatted logs.
    #[serde(default)]
    pub json: bool,
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_upload_url_ttl_secs() -> u64 {
    3600
}

const fn default_sweep_concurrency() -> usize {
    8
}

const fn default_sweep_interval_secs() -> u64 {
    3600
}

const fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `EXPLORE_ENV`)
    /// 3. Environment variables with `EXPLORE_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("EXPLORE_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("EXPLORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("EXPLORE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
