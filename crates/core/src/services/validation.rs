//! Publication rules for Explore videos.
//!
//! Both validators are pure and never fail; they report every violation so a
//! client can highlight all problems at once.

use serde::{Deserialize, Serialize};

/// Shortest publishable video, in seconds.
pub const MIN_DURATION_SECS: f64 = 8.0;

/// Longest publishable video, in seconds.
pub const MAX_DURATION_SECS: f64 = 60.0;

/// Descriptive metadata supplied with an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub lifestyle_categories: Vec<String>,
    /// Showcased property.
    #[serde(default)]
    pub property_id: Option<String>,
    /// Showcased development.
    #[serde(default)]
    pub development_id: Option<String>,
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    /// Violations in rule order; empty when valid.
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// The first violation, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Check a video's descriptive metadata.
#[must_use]
pub fn validate_metadata(metadata: &VideoMetadata) -> ValidationReport {
    let mut errors = Vec::new();

    if metadata.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }

    if metadata.tags.is_empty() {
        errors.push("At least one tag is required".to_string());
    }

    let linked = |id: &Option<String>| id.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !linked(&metadata.property_id) && !linked(&metadata.development_id) {
        errors.push("Video must be linked to a property or development".to_string());
    }

    ValidationReport::from_errors(errors)
}

/// Check a video's duration in seconds. Both bounds are inclusive.
#[must_use]
pub fn validate_duration(duration_secs: f64) -> ValidationReport {
    let error = if !duration_secs.is_finite() {
        Some("Duration must be a finite number of seconds".to_string())
    } else if duration_secs < MIN_DURATION_SECS {
        Some(format!("Duration must be at least {MIN_DURATION_SECS} seconds"))
    } else if duration_secs > MAX_DURATION_SECS {
        Some(format!("Duration must not exceed {MAX_DURATION_SECS} seconds"))
    } else {
        None
    };

    ValidationReport::from_errors(error.into_iter().collect())
}
