//! Stream schemas
//!
//! Provides the JSON Schema declarations streams are emitted with, and the
//! transformer that coerces raw report rows into conforming records.

mod transform;
mod types;

pub use transform::RecordTransformer;
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
