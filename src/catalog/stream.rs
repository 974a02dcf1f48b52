//! Catalog entries

use super::metadata::Metadata;
use crate::schema::JsonSchema;
use serde::{Deserialize, Serialize};

/// One stream as described by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    pub stream: String,

    /// Stream id used for dispatch and bookmarks
    pub tap_stream_id: String,

    /// Output schema
    pub schema: JsonSchema,

    /// Field and stream metadata
    #[serde(default)]
    pub metadata: Metadata,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,
}

impl CatalogEntry {
    /// Whether the stream is selected for sync
    pub fn is_selected(&self) -> bool {
        self.metadata.is_stream_selected()
    }
}
