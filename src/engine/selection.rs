//! Report field selection
//!
//! A statistics request names its dimensions and metrics explicitly. They
//! come from the synced fields of the stream, split by their declared role.

use crate::catalog::CatalogEntry;
use crate::error::{Error, Result};
use crate::types::FieldRole;

/// Most dimensions a statistics request accepts
pub const MAX_DIMENSIONS: usize = 3;

/// Fields synced for one stream, split by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    /// Every synced field, in schema order
    pub fields: Vec<String>,
    /// Synced fields tagged `dimension`
    pub dimensions: Vec<String>,
    /// Synced fields tagged `metric`
    pub metrics: Vec<String>,
}

impl FieldSelection {
    /// Select the synced fields of a stream
    pub fn from_stream(entry: &CatalogEntry) -> Self {
        let mut selection = Self::default();

        for field in entry.schema.field_names() {
            if !entry.metadata.should_sync_field(field) {
                continue;
            }
            match entry.metadata.role(field) {
                Some(FieldRole::Dimension) => selection.dimensions.push(field.to_string()),
                Some(FieldRole::Metric) => selection.metrics.push(field.to_string()),
                None => {}
            }
            selection.fields.push(field.to_string());
        }

        selection
    }

    /// Check the request bounds: at most three dimensions, at least one metric
    pub fn validate(&self, stream: &str) -> Result<()> {
        if self.dimensions.len() > MAX_DIMENSIONS {
            return Err(Error::field_selection(
                stream,
                format!(
                    "only supports up to {MAX_DIMENSIONS} selected dimensions, got {}",
                    self.dimensions.len()
                ),
            ));
        }
        if self.metrics.is_empty() {
            return Err(Error::field_selection(
                stream,
                "must have at least 1 selected metric",
            ));
        }
        Ok(())
    }

    /// Dimensions followed by metrics
    pub fn report_fields(&self) -> Vec<String> {
        self.dimensions
            .iter()
            .chain(&self.metrics)
            .cloned()
            .collect()
    }
}
