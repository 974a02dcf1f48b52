//! Synthetic fields
//!
//! Values the provider does not return but every report row carries: the
//! run timestamp, the report currency and the cross-device flag.

use crate::catalog::metadata::INCLUSION;
use crate::catalog::{Breadcrumb, CatalogEntry, Metadata};
use crate::schema::{JsonType, SchemaProperty};
use crate::types::{format_datetime, JsonObject, JsonValue};
use chrono::{DateTime, Utc};

/// Run timestamp field
pub const REPORT_DATETIME: &str = "_report_datetime";
/// Report currency field
pub const REPORT_CURRENCY: &str = "_report_currency";
/// Cross-device flag field
pub const REPORT_IGNORE_CROSS_DEVICE: &str = "_report_ignore_cross_device";

/// Append the synthetic fields to a report stream's schema and metadata.
///
/// The fields are `automatic` so they are always synced.
pub fn add_synthetic_fields(entry: &mut CatalogEntry) {
    let fields = [
        (
            REPORT_DATETIME,
            SchemaProperty::new(JsonType::String)
                .with_format("date-time")
                .with_description("DateTime of Report Run"),
        ),
        (
            REPORT_CURRENCY,
            SchemaProperty::nullable(JsonType::String)
                .with_description("Currency of all costs in report"),
        ),
        (
            REPORT_IGNORE_CROSS_DEVICE,
            SchemaProperty::nullable(JsonType::Boolean).with_description(
                "Ignore cross-device data. Null for TransactionID returns all data.",
            ),
        ),
    ];

    for (name, property) in fields {
        entry.schema.add_property(name, property);
        entry
            .metadata
            .set(&Breadcrumb::property(name), INCLUSION, JsonValue::from("automatic"));
    }
}

/// Synthetic values shared by every row of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticValues {
    report_datetime: String,
    currency: Option<String>,
    ignore_cross_device: Option<bool>,
}

impl SyntheticValues {
    /// Values for a stream run started at `report_datetime`
    pub fn for_stream(metadata: &Metadata, report_datetime: DateTime<Utc>) -> Self {
        Self {
            report_datetime: format_datetime(report_datetime),
            currency: metadata.currency().map(str::to_string),
            ignore_cross_device: metadata.ignore_cross_device().flatten(),
        }
    }

    /// Write the values into a row, replacing any provider value
    pub fn inject(&self, row: &mut JsonObject) {
        row.insert(
            REPORT_DATETIME.to_string(),
            JsonValue::String(self.report_datetime.clone()),
        );
        row.insert(
            REPORT_CURRENCY.to_string(),
            self.currency.clone().map_or(JsonValue::Null, JsonValue::String),
        );
        row.insert(
            REPORT_IGNORE_CROSS_DEVICE.to_string(),
            self.ignore_cross_device.map_or(JsonValue::Null, JsonValue::Bool),
        );
    }
}
