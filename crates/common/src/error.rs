//! Error types for the Explore engine.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Invalid metadata: {}", .0.join("; "))]
    InvalidMetadata(Vec<String>),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Reference not found: {0}")]
    ReferenceNotFound(String),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Content not found: {0}")]
    ContentNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    // === Server Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for structured responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidMetadata(_) => "INVALID_METADATA",
            Self::InvalidDuration(_) => "INVALID_DURATION",
            Self::ReferenceNotFound(_) => "REFERENCE_NOT_FOUND",
            Self::VideoNotFound(_) => "VIDEO_NOT_FOUND",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::ContentNotFound(_) => "CONTENT_NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether the caller can fix this error by changing its input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMetadata(_)
                | Self::InvalidDuration(_)
                | Self::ReferenceNotFound(_)
                | Self::VideoNotFound(_)
                | Self::SessionNotFound(_)
                | Self::ContentNotFound(_)
                | Self::Validation(_)
        )
    }

    /// Returns whether retrying the same call may succeed.
    ///
    /// Configuration faults are deployment problems and are never retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Storage(_))
    }

    /// Returns the detail list to render for this error.
    ///
    /// Metadata errors carry every violation; everything else yields its
    /// message as a single entry.
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        match self {
            Self::InvalidMetadata(violations) => violations.clone(),
            Self::InvalidDuration(message) => vec![message.clone()],
            other => vec![other.to_string()],
        }
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
