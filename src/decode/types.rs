//! Decoder types and traits

use crate::catalog::Metadata;
use crate::error::Result;
use crate::types::JsonObject;
use std::collections::BTreeMap;

/// Delimiter of statistics report CSV bodies
pub const REPORT_CSV_DELIMITER: char = ';';

/// Mapping from provider column labels to schema field names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    /// label -> field
    fields: BTreeMap<String, String>,
    /// Labels that must appear in the header
    required: Vec<String>,
}

impl ColumnMap {
    /// Create from a label -> field map
    pub fn new(fields: BTreeMap<String, String>) -> Self {
        Self {
            fields,
            required: Vec::new(),
        }
    }

    /// Build the map for a stream, requiring the labels of `selected` fields.
    ///
    /// Selected fields without a column label are not provider columns and
    /// are not required.
    pub fn for_stream<S: AsRef<str>>(metadata: &Metadata, selected: &[S]) -> Self {
        let required = selected
            .iter()
            .filter_map(|field| metadata.column_label(field.as_ref()))
            .map(str::to_string)
            .collect();
        Self {
            fields: metadata.column_labels(),
            required,
        }
    }

    /// Require a label to be present in the header
    #[must_use]
    pub fn require(mut self, label: impl Into<String>) -> Self {
        self.required.push(label.into());
        self
    }

    /// Field name for a column label
    pub fn field_for(&self, label: &str) -> Option<&str> {
        self.fields.get(label).map(String::as_str)
    }

    /// Labels that must appear in the header
    pub fn required_labels(&self) -> &[String] {
        &self.required
    }
}

/// Trait for decoding report bodies into rows
pub trait RecordDecoder: Send + Sync {
    /// Decode the body into rows keyed by schema field name
    fn decode(&self, body: &str) -> Result<Vec<JsonObject>>;
}
