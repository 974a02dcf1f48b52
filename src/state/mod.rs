//! Bookmark store
//!
//! Tracks per-stream, per-partition watermarks and persists them between runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Bookmarks keyed by rendered `BookmarkKey`
//! - `StateManager` - Shared access with optional atomic file persistence

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{Bookmark, BookmarkKey, State, ATTRIBUTION_WINDOW_BOOKMARK, DATE_BOOKMARK};

#[cfg(test)]
mod manager_tests;
