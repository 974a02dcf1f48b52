//! Record transformation against a stream schema
//!
//! Report rows arrive as strings. The transformer coerces each value to the
//! first declared type it fits, drops fields the schema does not declare, and
//! fails the whole record when a value fits none of them.

use super::types::{JsonSchema, JsonType, SchemaProperty};
use crate::error::{Error, Result};
use crate::types::{format_datetime, JsonObject, JsonValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Number;

/// Coerces raw rows into schema-conforming records for one stream
#[derive(Debug, Clone)]
pub struct RecordTransformer<'a> {
    stream: &'a str,
    schema: &'a JsonSchema,
}

impl<'a> RecordTransformer<'a> {
    /// Create a transformer for a stream
    pub fn new(stream: &'a str, schema: &'a JsonSchema) -> Self {
        Self { stream, schema }
    }

    /// Transform one row into a record
    pub fn transform(&self, row: JsonObject) -> Result<JsonObject> {
        let mut record = JsonObject::new();

        for (field, value) in row {
            let Some(property) = self.schema.get_property(&field) else {
                continue;
            };
            let coerced = coerce_value(&value, property).ok_or_else(|| {
                Error::transform(
                    self.stream,
                    format!(
                        "field '{field}' value {value} does not match type {}",
                        property.json_type
                    ),
                )
            })?;
            record.insert(field, coerced);
        }

        Ok(record)
    }
}

/// Coerce a value to a property declaration, or None if it cannot fit
fn coerce_value(value: &JsonValue, property: &SchemaProperty) -> Option<JsonValue> {
    let blank = match value {
        JsonValue::Null => true,
        JsonValue::String(s) => s.trim().is_empty(),
        _ => false,
    };
    let types = property.json_type.value_types();

    if blank && property.is_nullable() {
        // An empty string is still a valid plain string
        let keep_empty = matches!(value, JsonValue::String(_))
            && types.contains(&JsonType::String)
            && !property.is_date_time();
        return Some(if keep_empty { value.clone() } else { JsonValue::Null });
    }

    types
        .into_iter()
        .find_map(|json_type| coerce_to(value, json_type, property))
}

fn coerce_to(value: &JsonValue, json_type: JsonType, property: &SchemaProperty) -> Option<JsonValue> {
    match json_type {
        JsonType::Integer => to_integer(value),
        JsonType::Number => to_number(value),
        JsonType::Boolean => to_boolean(value),
        JsonType::String if property.is_date_time() => to_date_time(value),
        JsonType::String => match value {
            JsonValue::String(s) => Some(JsonValue::String(s.clone())),
            JsonValue::Number(n) => Some(JsonValue::String(n.to_string())),
            JsonValue::Bool(b) => Some(JsonValue::String(b.to_string())),
            _ => None,
        },
        JsonType::Object => value.is_object().then(|| value.clone()),
        JsonType::Array => value.is_array().then(|| value.clone()),
        JsonType::Null => value.is_null().then_some(JsonValue::Null),
    }
}

fn to_integer(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Some(value.clone()),
        JsonValue::Number(n) => n.as_f64().and_then(integral_f64),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .map(|n| JsonValue::Number(n.into()))
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    }
}

#[allow(clippy::float_cmp)]
fn integral_f64(f: f64) -> Option<JsonValue> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Some(JsonValue::Number((f as i64).into()))
    } else {
        None
    }
}

fn to_number(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Number(_) => Some(value.clone()),
        JsonValue::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(JsonValue::Number),
        _ => None,
    }
}

fn to_boolean(value: &JsonValue) -> Option<JsonValue> {
    match value {
        JsonValue::Bool(_) => Some(value.clone()),
        JsonValue::Number(n) => match n.as_i64() {
            Some(0) => Some(JsonValue::Bool(false)),
            Some(1) => Some(JsonValue::Bool(true)),
            _ => None,
        },
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(JsonValue::Bool(true)),
            "false" | "0" => Some(JsonValue::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

fn to_date_time(value: &JsonValue) -> Option<JsonValue> {
    let JsonValue::String(s) = value else {
        return None;
    };
    parse_date_time(s.trim()).map(|dt| JsonValue::String(format_datetime(dt)))
}

/// Parse the datetime shapes the report endpoint produces
fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(s, fmt) {
            return day.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}
