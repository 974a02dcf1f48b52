//! Common types used throughout tap-criteo
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Field Metadata Enums
// ============================================================================

/// Inclusion category of a field, as declared in catalog metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    /// Always synced, regardless of selection
    Automatic,
    /// Synced only when explicitly selected
    #[default]
    Available,
    /// Never synced
    Unsupported,
}

impl Inclusion {
    /// Decide whether a field with this inclusion and selection state is synced
    pub fn should_sync(self, selected: Option<bool>) -> bool {
        match self {
            Inclusion::Automatic => true,
            Inclusion::Unsupported => false,
            Inclusion::Available => selected.unwrap_or(false),
        }
    }
}

/// Role of a report field in a statistics request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    /// Grouping column (Day, CampaignId, ...)
    Dimension,
    /// Aggregated value (Clicks, Cost, ...)
    Metric,
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Dates
// ============================================================================

/// Format used for every datetime written to state and records
pub const DATETIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Format a day as a midnight UTC datetime string
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%dT00:00:00.000000Z").to_string()
}

/// Format a UTC datetime
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format(DATETIME_FMT).to_string()
}

/// Parse a day from either `YYYY-MM-DD` or an RFC 3339 datetime.
///
/// Datetimes are converted to UTC before the calendar day is taken.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|e| Error::Other(format!("Invalid date '{value}': {e}")))
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusion_should_sync() {
        assert!(Inclusion::Automatic.should_sync(None));
        assert!(Inclusion::Automatic.should_sync(Some(false)));
        assert!(Inclusion::Available.should_sync(Some(true)));
        assert!(!Inclusion::Available.should_sync(Some(false)));
        assert!(!Inclusion::Available.should_sync(None));
        assert!(!Inclusion::Unsupported.should_sync(Some(true)));
    }

    #[test]
    fn test_inclusion_serde() {
        let inclusion: Inclusion = serde_json::from_str("\"automatic\"").unwrap();
        assert_eq!(inclusion, Inclusion::Automatic);

        let json = serde_json::to_string(&Inclusion::Unsupported).unwrap();
        assert_eq!(json, "\"unsupported\"");
    }

    #[test]
    fn test_field_role_serde() {
        let role: FieldRole = serde_json::from_str("\"metric\"").unwrap();
        assert_eq!(role, FieldRole::Metric);
    }

    #[test]
    fn test_parse_day_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(parse_day("2024-03-10").unwrap(), expected);
        assert_eq!(parse_day("2024-03-10T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_day("2024-03-10T00:00:00.000000Z").unwrap(), expected);
        assert_eq!(parse_day("2024-03-10T23:30:00-02:00").unwrap(), expected.succ_opt().unwrap());
        assert!(parse_day("March 10th").is_err());
    }

    #[test]
    fn test_format_day() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(format_day(day), "2024-01-03T00:00:00.000000Z");
        assert_eq!(parse_day(&format_day(day)).unwrap(), day);
    }

    #[test]
    fn test_option_string_none_if_empty() {
        assert_eq!(
            Some("111".to_string()).none_if_empty(),
            Some("111".to_string())
        );
        assert_eq!(Some(String::new()).none_if_empty(), None);
        assert_eq!(Some("  ".to_string()).none_if_empty(), None);
        assert_eq!(None::<String>.none_if_empty(), None);
    }
}
