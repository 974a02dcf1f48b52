//! State types for tracking sync progress
//!
//! These types are serialized to JSON and persisted between runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the durable low-watermark bookmark
pub const DATE_BOOKMARK: &str = "date";

/// Name of the in-flight attribution re-scan cursor
pub const ATTRIBUTION_WINDOW_BOOKMARK: &str = "last_attribution_window_date";

/// Identity of a bookmark entry: a stream, optionally scoped to a partition.
///
/// Two partitions of the same stream never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookmarkKey {
    stream: String,
    partition: Option<String>,
}

impl BookmarkKey {
    /// Key for a stream without a partition
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            partition: None,
        }
    }

    /// Key for a stream scoped to a partition (empty partitions are ignored)
    pub fn partitioned(stream: impl Into<String>, partition: Option<&str>) -> Self {
        Self {
            stream: stream.into(),
            partition: partition
                .filter(|p| !p.is_empty())
                .map(ToString::to_string),
        }
    }

    /// Stream id part of the key
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Partition part of the key
    pub fn partition(&self) -> Option<&str> {
        self.partition.as_deref()
    }
}

impl fmt::Display for BookmarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.partition {
            Some(partition) => write!(f, "{}_{}", self.stream, partition),
            None => f.write_str(&self.stream),
        }
    }
}

/// Named watermark values for one bookmark key
pub type Bookmark = BTreeMap<String, String>;

/// Complete tap state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Bookmarks by rendered key
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all watermarks for a key
    pub fn bookmark(&self, key: &BookmarkKey) -> Option<&Bookmark> {
        self.bookmarks.get(&key.to_string())
    }

    /// Get a named watermark
    pub fn get_bookmark(&self, key: &BookmarkKey, name: &str) -> Option<&str> {
        self.bookmark(key)?.get(name).map(String::as_str)
    }

    /// Set a named watermark, creating the entry if needed
    pub fn set_bookmark(&mut self, key: &BookmarkKey, name: &str, value: impl Into<String>) {
        self.bookmarks
            .entry(key.to_string())
            .or_default()
            .insert(name.to_string(), value.into());
    }

    /// Remove a named watermark, leaving the other watermarks of the key untouched
    pub fn clear_bookmark(&mut self, key: &BookmarkKey, name: &str) {
        if let Some(bookmark) = self.bookmarks.get_mut(&key.to_string()) {
            bookmark.remove(name);
        }
    }
}
