//! CLI module
//!
//! Singer-style command line: `--discover` prints the catalog, otherwise
//! the selected streams of `--catalog` are synced to stdout.

mod commands;
mod runner;

pub use commands::{Cli, Mode};
pub use runner::Runner;
