//! Optional time window for analytics queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A `[start, end]` window over event timestamps.
///
/// A missing bound leaves that side open; it never means the epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    /// Inclusive lower bound.
    #[serde(default, rename = "startDate")]
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    #[serde(default, rename = "endDate")]
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    /// A window with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// A window with the given bounds.
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_missing_bounds_stay_open() {
        let window: DateWindow = serde_json::from_str("{}").unwrap();
        assert_eq!(window, DateWindow::unbounded());

        let window: DateWindow =
            serde_json::from_str(r#"{"startDate":"2026-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(
            window,
            DateWindow::new(Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()), None)
        );
    }

    #[test]
    fn test_bounds_use_request_field_names() {
        let end = Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap();
        let value = serde_json::to_value(DateWindow::new(None, Some(end))).unwrap();

        assert!(value["startDate"].is_null());
        assert_eq!(value["endDate"], "2026-03-31T23:59:59Z");
    }
}
