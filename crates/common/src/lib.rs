//! Common utilities and shared types for the Explore engine.
//!
//! This crate provides foundational components used across all explore crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Storage**: Upload URL signing backends (local, S3-compatible)
//! - **Windows**: Optional `[start, end]` bounds via [`DateWindow`]
//!
//! # Example
//!
//! ```no_run
//! use explore_common::{AppResult, Config, IdGenerator};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id = IdGenerator::new().generate();
//!     println!("{} -> {}", config.database.url, id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;
pub mod window;

pub use config::{Config, ExploreConfig, StorageKind, StorageSettings};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    LocalSignedStorage, ObjectStorage, StorageService, THUMBNAIL_CONTENT_TYPE, UploadKeys,
    build_storage, generate_upload_keys,
};
pub use window::DateWindow;

#[cfg(feature = "s3")]
pub use storage::S3Storage;
