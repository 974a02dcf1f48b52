//! Catalog discovery from the embedded report resources

use super::metadata::{Breadcrumb, Metadata, MetadataEntry};
use super::stream::CatalogEntry;
use super::Catalog;
use crate::endpoints::ReportType;
use crate::error::{Error, Result};
use crate::schema::JsonSchema;
use tracing::debug;

const STATISTICS_SCHEMA: &str = include_str!("../../resources/Statistics.schema.json");
const STATISTICS_METADATA: &str = include_str!("../../resources/Statistics.metadata.json");

/// Build the catalog of every statistics report type
pub fn discover() -> Result<Catalog> {
    let schema: JsonSchema = serde_json::from_str(STATISTICS_SCHEMA)
        .map_err(|e| Error::catalog(format!("invalid statistics schema: {e}")))?;
    let entries: Vec<MetadataEntry> = serde_json::from_str(STATISTICS_METADATA)
        .map_err(|e| Error::catalog(format!("invalid statistics metadata: {e}")))?;
    let base = Metadata::from_list(entries);

    let streams = ReportType::ALL
        .into_iter()
        .map(|report| {
            let mut metadata = base.clone();
            for (key, value) in report.root_metadata_overrides() {
                metadata.set(&Breadcrumb::root(), key, value);
            }
            debug!(stream = report.as_str(), "Discovered stream");
            CatalogEntry {
                stream: report.as_str().to_string(),
                tap_stream_id: report.as_str().to_string(),
                schema: schema.clone(),
                key_properties: metadata.key_properties(),
                metadata,
            }
        })
        .collect();

    Ok(Catalog { streams })
}
