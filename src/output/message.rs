//! Singer messages

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// A message on the tap's output stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, sent before the stream's records
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// One record
    Record {
        /// Stream name
        stream: String,
        /// Record body
        record: JsonObject,
        /// Extraction timestamp
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<String>,
    },
    /// Full bookmark state
    State {
        /// State document
        value: JsonValue,
    },
}

impl Message {
    /// Stream this message belongs to, if any
    pub fn stream(&self) -> Option<&str> {
        match self {
            Message::Schema { stream, .. } | Message::Record { stream, .. } => Some(stream),
            Message::State { .. } => None,
        }
    }
}
