//! Engine types
//!
//! Run configuration, sync windows and statistics for the sync engine.

use crate::config::{TapConfig, DEFAULT_CONVERSION_WINDOW_DAYS};
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};

/// Configuration for a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Low-watermark used when a stream has no `date` bookmark
    pub start_date: NaiveDate,
    /// Last day to sync, fixed for the whole run
    pub end_date: NaiveDate,
    /// Offset applied to the low-watermark when no re-scan is in progress
    pub conversion_window_days: i64,
    /// Advertiser filter and bookmark partition
    pub partition: Option<String>,
    /// Run timestamp written into every row
    pub report_datetime: DateTime<Utc>,
}

impl SyncConfig {
    /// Create a config for the inclusive range `[start_date, end_date]`
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            conversion_window_days: DEFAULT_CONVERSION_WINDOW_DAYS,
            partition: None,
            report_datetime: Utc::now(),
        }
    }

    /// Build from the tap config; `end_date` falls back to `today`
    pub fn from_tap_config(config: &TapConfig, today: NaiveDate) -> Result<Self> {
        Ok(Self {
            start_date: config.start_day()?,
            end_date: config.end_day()?.unwrap_or(today),
            conversion_window_days: config.conversion_window_days,
            partition: config.partition(),
            report_datetime: Utc::now(),
        })
    }

    /// Set the conversion window
    #[must_use]
    pub fn with_conversion_window_days(mut self, days: i64) -> Self {
        self.conversion_window_days = days;
        self
    }

    /// Set the advertiser partition
    #[must_use]
    pub fn with_partition(mut self, partition: Option<&str>) -> Self {
        self.partition = partition.filter(|p| !p.is_empty()).map(str::to_string);
        self
    }

    /// Set the run timestamp
    #[must_use]
    pub fn with_report_datetime(mut self, report_datetime: DateTime<Utc>) -> Self {
        self.report_datetime = report_datetime;
        self
    }
}

/// Inclusive day range scanned for one stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncWindow {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
    /// Whether `start` came from an interrupted re-scan
    pub resumed: bool,
}

impl SyncWindow {
    /// Whether the window holds no day
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Days in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Total records emitted
    pub records_synced: usize,
    /// Report days fetched
    pub days_fetched: usize,
    /// Streams synced
    pub streams_synced: usize,
    /// Streams recognized but not extracted
    pub streams_skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a fetched day
    pub fn add_day(&mut self) {
        self.days_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add a skipped stream
    pub fn add_skipped(&mut self) {
        self.streams_skipped += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
