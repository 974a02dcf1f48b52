//! # tap-criteo
//!
//! A Singer tap for the Criteo Marketing API statistics endpoint.
//!
//! Each selected report stream is fetched one day at a time as CSV, coerced
//! against the stream schema and written to stdout as Singer `SCHEMA`,
//! `RECORD` and `STATE` messages. Days inside the conversion window are
//! re-fetched on every run so late attributions are picked up, and a cursor
//! bookmark lets an interrupted run resume on the exact day it stopped.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_criteo::{discover, MemorySink, StateManager, SyncConfig, SyncEngine};
//!
//! #[tokio::main]
//! async fn main() -> tap_criteo::Result<()> {
//!     let config = tap_criteo::TapConfig::from_file("config.json")?;
//!     let http = tap_criteo::http::HttpClient::with_config(config.http_config())?;
//!     let client = tap_criteo::CriteoClient::new(http, config.token_url(), config.credentials());
//!
//!     let catalog = tap_criteo::Catalog::from_file("catalog.json")?;
//!     let sync_config = SyncConfig::from_tap_config(&config, chrono::Utc::now().date_naive())?;
//!     let mut engine = SyncEngine::new(client, MemorySink::new(), StateManager::in_memory(), sync_config);
//!     engine.sync_catalog(&catalog).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   cli::Runner   --discover → catalog   otherwise → sync       │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬──────────────────┴──────┬───────────┬────────────┐
//! │ catalog  │        engine           │  source   │  output    │
//! ├──────────┼─────────────────────────┼───────────┼────────────┤
//! │ schema   │ window / day loop       │ StatsQuery│ SingerWriter│
//! │ metadata │ field selection         │ auth      │ MemorySink │
//! │ discover │ synthetic fields, state │ http      │            │
//! └──────────┴─────────────────────────┴───────────┴────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// OAuth2 client-credentials session
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Report CSV decoding
pub mod decode;

/// Bookmark state and persistence
pub mod state;

/// JSON schema types and record coercion
pub mod schema;

/// Singer catalog, metadata and discovery
pub mod catalog;

/// Stream kinds and report types
pub mod endpoints;

/// Statistics endpoint client
pub mod source;

/// Singer message output
pub mod output;

/// Windowed sync engine
pub mod engine;

/// Tap configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::{discover, Catalog, CatalogEntry};
pub use config::TapConfig;
pub use endpoints::{ReportType, StreamKind};
pub use engine::{SyncConfig, SyncEngine, SyncStats};
pub use output::{MemorySink, RecordSink, SingerWriter};
pub use source::{CriteoClient, ReportSource, StatsQuery};
pub use state::{BookmarkKey, StateManager};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
