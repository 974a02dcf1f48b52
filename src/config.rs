//! Tap configuration
//!
//! The config file is a flat JSON object. Only `start_date`, `client_id` and
//! `client_secret` are required; everything else has a default.

use crate::auth::ClientCredentials;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{parse_day, OptionStringExt};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use url::Url;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.criteo.com/marketing";

/// Default offset applied to the low-watermark, in days
pub const DEFAULT_CONVERSION_WINDOW_DAYS: i64 = -30;

/// Tap configuration
#[derive(Clone, Deserialize)]
pub struct TapConfig {
    /// First day to sync when no bookmark exists
    #[serde(default)]
    pub start_date: String,

    /// Last day to sync; today when absent
    #[serde(default)]
    pub end_date: Option<String>,

    /// Comma-separated advertiser filter; also partitions bookmarks
    #[serde(default)]
    pub advertiser_ids: Option<String>,

    /// Offset applied to the low-watermark when no re-scan is in progress
    #[serde(
        default = "default_conversion_window_days",
        deserialize_with = "deserialize_days"
    )]
    pub conversion_window_days: i64,

    /// OAuth2 client id
    #[serde(default)]
    pub client_id: String,

    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: String,

    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token endpoint; `<base_url>/oauth2/token` when absent
    #[serde(default)]
    pub token_url: Option<String>,

    /// Retries for transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Request rate limit
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_conversion_window_days() -> i64 {
    DEFAULT_CONVERSION_WINDOW_DAYS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_retries() -> u32 {
    5
}

fn default_requests_per_second() -> u32 {
    5
}

/// Accept a JSON integer or a numeric string
fn deserialize_days<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Days {
        Number(i64),
        Text(String),
    }

    match Days::deserialize(deserializer)? {
        Days::Number(n) => Ok(n),
        Days::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid number of days '{s}'"))),
    }
}

impl TapConfig {
    /// Load and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::config(format!("Failed to read config file: {e}")))?;
        Self::from_json(&content)
    }

    /// Parse and validate inline config JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check required keys and parse dates and URLs eagerly
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("start_date", &self.start_date),
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        let start = self.start_day()?;
        self.end_day()?;

        let in_range = TimeDelta::try_days(self.conversion_window_days)
            .and_then(|delta| start.checked_add_signed(delta))
            .is_some();
        if !in_range {
            return Err(Error::invalid_value(
                "conversion_window_days",
                format!(
                    "{} days from {start} is not a representable date",
                    self.conversion_window_days
                ),
            ));
        }

        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        Url::parse(&self.token_url())
            .map_err(|e| Error::invalid_value("token_url", e.to_string()))?;
        Ok(())
    }

    /// Configured start day
    pub fn start_day(&self) -> Result<NaiveDate> {
        parse_day(&self.start_date).map_err(|e| Error::invalid_value("start_date", e.to_string()))
    }

    /// Configured end day, if any
    pub fn end_day(&self) -> Result<Option<NaiveDate>> {
        self.end_date
            .clone()
            .none_if_empty()
            .map(|s| parse_day(&s).map_err(|e| Error::invalid_value("end_date", e.to_string())))
            .transpose()
    }

    /// Advertiser filter, `None` when unset or blank
    pub fn partition(&self) -> Option<String> {
        self.advertiser_ids.clone().none_if_empty()
    }

    /// Resolved token endpoint
    pub fn token_url(&self) -> String {
        self.token_url.clone().none_if_empty().unwrap_or_else(|| {
            format!("{}/oauth2/token", self.base_url.trim_end_matches('/'))
        })
    }

    /// OAuth2 credentials
    pub fn credentials(&self) -> ClientCredentials {
        ClientCredentials::new(&self.client_id, &self.client_secret)
    }

    /// HTTP client settings
    pub fn http_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(&self.base_url)
            .max_retries(self.max_retries)
            .rate_limit(RateLimiterConfig::per_second(self.requests_per_second))
            .build()
    }
}

impl fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapConfig")
            .field("start_date", &self.start_date)
            .field("end_date", &self.end_date)
            .field("advertiser_ids", &self.advertiser_ids)
            .field("conversion_window_days", &self.conversion_window_days)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}
