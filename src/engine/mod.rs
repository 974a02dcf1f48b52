//! Windowed sync engine
//!
//! Statistics reports are re-scanned day by day over a trailing window so
//! late conversions are picked up. Two bookmarks drive a run:
//!
//! - `date` is the low-watermark: the latest day fully emitted.
//! - `last_attribution_window_date` is the next day of an unfinished
//!   re-scan. It only exists while a scan is in progress, so an
//!   interrupted run resumes exactly where it stopped.
//!
//! Each day runs fetch, emit, then advance; state is emitted after every
//! bookmark change.

mod selection;
pub mod synthetic;
mod types;

pub use selection::{FieldSelection, MAX_DIMENSIONS};
pub use synthetic::{add_synthetic_fields, SyntheticValues};
pub use types::{SyncConfig, SyncStats, SyncWindow};

use crate::catalog::{Catalog, CatalogEntry};
use crate::decode::{ColumnMap, RecordDecoder, ReportCsvDecoder};
use crate::endpoints::{ReportType, StreamKind};
use crate::error::{Error, Result};
use crate::output::RecordSink;
use crate::schema::RecordTransformer;
use crate::source::{ReportSource, StatsQuery};
use crate::state::{BookmarkKey, StateManager, ATTRIBUTION_WINDOW_BOOKMARK, DATE_BOOKMARK};
use crate::types::{format_datetime, format_day, parse_day};
use chrono::{Days, NaiveDate, TimeDelta, Utc};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Replication key declared on every report stream
const REPLICATION_KEY: &str = "Day";

/// Sync engine for statistics reports
pub struct SyncEngine<S, K> {
    /// Report source
    source: S,
    /// Message sink
    sink: K,
    /// Bookmark store
    state: StateManager,
    /// Run configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl<S: ReportSource, K: RecordSink> SyncEngine<S, K> {
    /// Create a new sync engine
    pub fn new(source: S, sink: K, state: StateManager, config: SyncConfig) -> Self {
        Self {
            source,
            sink,
            state,
            config,
            stats: SyncStats::default(),
        }
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get the sink
    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Get the source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get the run configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Get statistics
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Sync every selected stream of a catalog, in catalog order.
    ///
    /// Stream kinds are resolved before anything is fetched, so an
    /// unrecognized stream fails the run up front.
    pub async fn sync_catalog(&mut self, catalog: &Catalog) -> Result<SyncStats> {
        let start = Instant::now();

        let selected = catalog
            .selected_streams()
            .map(|entry| StreamKind::resolve(&entry.tap_stream_id).map(|kind| (entry, kind)))
            .collect::<Result<Vec<_>>>()?;

        if selected.is_empty() {
            warn!("No streams selected");
        }

        match self.config.partition.as_deref() {
            Some(ids) => info!(advertiser_ids = ids, "Syncing advertiser IDs"),
            None => info!("Syncing all advertiser IDs"),
        }

        for (entry, kind) in selected {
            info!(stream = %entry.stream, "Syncing stream");
            match kind {
                StreamKind::Statistics(report) => {
                    self.sync_report(entry, report).await?;
                }
                StreamKind::SellerStats(report) => {
                    warn!(
                        stream = %entry.stream,
                        report_type = report.as_str(),
                        "Seller statistics reports are not supported, skipping"
                    );
                    self.stats.add_skipped();
                }
            }
        }

        self.stats.set_duration(start.elapsed().as_millis() as u64);
        Ok(self.stats.clone())
    }

    /// Compute the scan window of a bookmark key.
    ///
    /// An unfinished re-scan resumes from its cursor verbatim. Otherwise the
    /// scan starts at the low-watermark (or configured start date) shifted
    /// by the conversion window.
    pub async fn compute_window(&self, key: &BookmarkKey) -> Result<SyncWindow> {
        let end = self.config.end_date;

        if let Some(cursor) = self.state.get_bookmark(key, ATTRIBUTION_WINDOW_BOOKMARK).await {
            let start = parse_bookmark(key, ATTRIBUTION_WINDOW_BOOKMARK, &cursor)?;
            return Ok(SyncWindow {
                start,
                end,
                resumed: true,
            });
        }

        let watermark = self.low_watermark(key).await?;
        let offset = self.config.conversion_window_days;
        let start = TimeDelta::try_days(offset)
            .and_then(|delta| watermark.checked_add_signed(delta))
            .ok_or_else(|| {
                Error::config(format!("conversion window of {offset} days is out of range"))
            })?;

        Ok(SyncWindow {
            start,
            end,
            resumed: false,
        })
    }

    /// Sync one statistics report stream
    pub async fn sync_report(&mut self, entry: &CatalogEntry, report: ReportType) -> Result<usize> {
        let mut entry = entry.clone();
        add_synthetic_fields(&mut entry);
        let stream = entry.stream.clone();

        let selection = FieldSelection::from_stream(&entry);
        info!(stream = %stream, fields = ?selection.fields, "Request fields");
        info!(stream = %stream, dimensions = ?selection.dimensions, "Selected dimensions");
        info!(stream = %stream, metrics = ?selection.metrics, "Selected metrics");
        selection.validate(&stream)?;

        self.sink.emit_schema(
            &stream,
            &entry.schema,
            &entry.key_properties,
            &[REPLICATION_KEY.to_string()],
        )?;

        let key = BookmarkKey::partitioned(&entry.tap_stream_id, self.config.partition.as_deref());
        let window = self.compute_window(&key).await?;
        info!(
            stream = %stream,
            start = %window.start,
            end = %window.end,
            resumed = window.resumed,
            "Computed sync window"
        );

        let decoder = ReportCsvDecoder::new(ColumnMap::for_stream(
            &entry.metadata,
            &selection.report_fields(),
        ));
        let synthetic = SyntheticValues::for_stream(&entry.metadata, self.config.report_datetime);

        let mut total = 0;
        for day in window.days() {
            let query = StatsQuery::for_day(
                report,
                day,
                selection.dimensions.clone(),
                selection.metrics.clone(),
            )
            .with_currency(entry.metadata.currency())
            .with_advertiser_ids(self.config.partition.as_deref())
            .with_ignore_x_device(entry.metadata.ignore_cross_device());

            total += self
                .sync_day(&entry, &query, &decoder, &synthetic)
                .await?;
            self.advance(&key, day).await?;
        }

        self.state
            .clear_bookmark(&key, ATTRIBUTION_WINDOW_BOOKMARK)
            .await?;
        self.emit_state().await?;

        self.stats.add_stream();
        info!(
            stream = %stream,
            advertiser_ids = ?self.config.partition,
            records = total,
            "Done syncing report"
        );
        Ok(total)
    }

    /// Fetch one day and emit its rows; any row failure aborts the stream
    async fn sync_day(
        &mut self,
        entry: &CatalogEntry,
        query: &StatsQuery,
        decoder: &dyn RecordDecoder,
        synthetic: &SyntheticValues,
    ) -> Result<usize> {
        let body = self.source.fetch_report(query).await?;
        self.stats.add_day();

        let rows = decoder.decode(&body)?;
        let time_extracted = format_datetime(Utc::now());
        let transformer = RecordTransformer::new(&entry.stream, &entry.schema);

        let mut count = 0;
        for mut row in rows {
            synthetic.inject(&mut row);
            let record = transformer.transform(row)?;
            self.sink
                .emit_record(&entry.stream, record, Some(&time_extracted))?;
            count += 1;
        }

        self.stats.add_records(count);
        info!(
            stream = %entry.stream,
            day = %query.start_date,
            records = count,
            "Synced report day"
        );
        Ok(count)
    }

    /// Move the bookmarks past a completed day
    async fn advance(&mut self, key: &BookmarkKey, day: NaiveDate) -> Result<()> {
        let watermark = self.low_watermark(key).await?;
        if day > watermark {
            debug!(%key, %day, %watermark, "Updating date bookmark");
            self.state
                .set_bookmark(key, DATE_BOOKMARK, format_day(day))
                .await?;
            self.emit_state().await?;
        } else {
            debug!(%key, %day, %watermark, "Not updating date bookmark");
        }

        let next = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::state(format!("no day after {day}")))?;
        self.state
            .set_bookmark(key, ATTRIBUTION_WINDOW_BOOKMARK, format_day(next))
            .await?;
        self.emit_state().await
    }

    /// Current `date` bookmark, or the configured start date
    async fn low_watermark(&self, key: &BookmarkKey) -> Result<NaiveDate> {
        match self.state.get_bookmark(key, DATE_BOOKMARK).await {
            Some(value) => parse_bookmark(key, DATE_BOOKMARK, &value),
            None => Ok(self.config.start_date),
        }
    }

    /// Emit the full state to the sink
    async fn emit_state(&mut self) -> Result<()> {
        let state = self.state.snapshot().await;
        self.sink.emit_state(&state)
    }
}

fn parse_bookmark(key: &BookmarkKey, name: &str, value: &str) -> Result<NaiveDate> {
    parse_day(value).map_err(|e| Error::state(format!("invalid '{name}' bookmark for {key}: {e}")))
}
