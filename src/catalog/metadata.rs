//! Field metadata keyed by breadcrumb
//!
//! Catalog metadata arrives as a list of `{breadcrumb, metadata}` entries.
//! `Metadata` holds it as a map from `Breadcrumb` to the entry's key/value
//! object, with typed accessors for the keys the tap reads.

use crate::types::{FieldRole, Inclusion, JsonObject, JsonValue};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Inclusion category key
pub const INCLUSION: &str = "inclusion";
/// Selection flag key
pub const SELECTED: &str = "selected";
/// Dimension / metric role key
pub const BEHAVIOUR: &str = "tap-criteo.behaviour";
/// Provider column label key
pub const COLUMN_NAME: &str = "tap-criteo.col-name";
/// Report currency key (stream level)
pub const CURRENCY: &str = "currency";
/// Cross-device flag key (stream level)
pub const IGNORE_CROSS_DEVICE: &str = "tap-criteo.ignoreXDevice";
/// Primary key list (stream level)
pub const TABLE_KEY_PROPERTIES: &str = "table-key-properties";

/// Path of a metadata entry: empty for the stream, `["properties", name]` for a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breadcrumb(Vec<String>);

impl Breadcrumb {
    /// The stream-level breadcrumb
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Breadcrumb of a top-level schema property
    pub fn property(name: impl Into<String>) -> Self {
        Self(vec!["properties".to_string(), name.into()])
    }

    /// Whether this is the stream-level breadcrumb
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Property name, when this points at a top-level property
    pub fn property_name(&self) -> Option<&str> {
        match self.0.as_slice() {
            [kind, name] if kind == "properties" => Some(name.as_str()),
            _ => None,
        }
    }
}

/// One entry of the list form of metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path the entry applies to
    pub breadcrumb: Breadcrumb,
    /// Key/value pairs for the path
    #[serde(default)]
    pub metadata: JsonObject,
}

/// Metadata map for one stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: BTreeMap<Breadcrumb, JsonObject>,
}

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the list form; later entries for the same breadcrumb win per key
    pub fn from_list(list: Vec<MetadataEntry>) -> Self {
        let mut metadata = Self::new();
        for entry in list {
            metadata
                .entries
                .entry(entry.breadcrumb)
                .or_default()
                .extend(entry.metadata);
        }
        metadata
    }

    /// Convert to the list form, stream entry first
    pub fn to_list(&self) -> Vec<MetadataEntry> {
        self.entries
            .iter()
            .map(|(breadcrumb, metadata)| MetadataEntry {
                breadcrumb: breadcrumb.clone(),
                metadata: metadata.clone(),
            })
            .collect()
    }

    /// All key/value pairs for a breadcrumb
    pub fn entry(&self, breadcrumb: &Breadcrumb) -> Option<&JsonObject> {
        self.entries.get(breadcrumb)
    }

    /// Get a value; `Some(Null)` means the key is present and explicitly null
    pub fn get(&self, breadcrumb: &Breadcrumb, key: &str) -> Option<&JsonValue> {
        self.entries.get(breadcrumb)?.get(key)
    }

    /// Set a value, creating the breadcrumb entry if needed
    pub fn set(&mut self, breadcrumb: &Breadcrumb, key: &str, value: JsonValue) {
        self.entries
            .entry(breadcrumb.clone())
            .or_default()
            .insert(key.to_string(), value);
    }

    // ------------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------------

    /// Whether the stream itself is selected
    pub fn is_stream_selected(&self) -> bool {
        self.selected(&Breadcrumb::root()).unwrap_or(false)
    }

    /// Selection flag of a breadcrumb
    pub fn selected(&self, breadcrumb: &Breadcrumb) -> Option<bool> {
        self.get(breadcrumb, SELECTED).and_then(JsonValue::as_bool)
    }

    /// Inclusion category of a field; fields without one are `available`
    pub fn inclusion(&self, field: &str) -> Inclusion {
        self.get(&Breadcrumb::property(field), INCLUSION)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Whether a field is synced under the inclusion/selection rule
    pub fn should_sync_field(&self, field: &str) -> bool {
        self.inclusion(field)
            .should_sync(self.selected(&Breadcrumb::property(field)))
    }

    /// Declared dimension / metric role of a field
    pub fn role(&self, field: &str) -> Option<FieldRole> {
        self.get(&Breadcrumb::property(field), BEHAVIOUR)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Provider column label of a field
    pub fn column_label(&self, field: &str) -> Option<&str> {
        self.get(&Breadcrumb::property(field), COLUMN_NAME)
            .and_then(JsonValue::as_str)
    }

    /// Map of provider column label to field name
    pub fn column_labels(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .filter_map(|(breadcrumb, values)| {
                let field = breadcrumb.property_name()?;
                let label = values.get(COLUMN_NAME)?.as_str()?;
                Some((label.to_string(), field.to_string()))
            })
            .collect()
    }

    /// Report currency declared on the stream
    pub fn currency(&self) -> Option<&str> {
        self.get(&Breadcrumb::root(), CURRENCY)
            .and_then(JsonValue::as_str)
    }

    /// Cross-device flag declared on the stream.
    ///
    /// `None` when absent, `Some(None)` when explicitly null.
    pub fn ignore_cross_device(&self) -> Option<Option<bool>> {
        self.get(&Breadcrumb::root(), IGNORE_CROSS_DEVICE)
            .map(JsonValue::as_bool)
    }

    /// Primary key list declared on the stream
    pub fn key_properties(&self) -> Vec<String> {
        self.get(&Breadcrumb::root(), TABLE_KEY_PROPERTIES)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_list().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Metadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<MetadataEntry>::deserialize(deserializer).map(Self::from_list)
    }
}
