//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Singer tap for the Criteo Marketing API
#[derive(Parser, Debug)]
#[command(name = "tap-criteo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, conflicts_with = "config")]
    pub config_json: Option<String>,

    /// State file (JSON); rewritten after every bookmark change
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long)]
    pub state_json: Option<String>,

    /// Catalog file with stream and field selections
    #[arg(long, visible_alias = "properties")]
    pub catalog: Option<PathBuf>,

    /// Print the catalog and exit
    #[arg(short, long)]
    pub discover: bool,
}

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the catalog
    Discover,
    /// Sync the selected streams
    Sync,
}

impl Cli {
    /// Mode selected by the flags
    pub fn mode(&self) -> Mode {
        if self.discover {
            Mode::Discover
        } else {
            Mode::Sync
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_flags() {
        let cli = Cli::try_parse_from([
            "tap-criteo",
            "--config",
            "config.json",
            "--state",
            "state.json",
            "--catalog",
            "catalog.json",
        ])
        .unwrap();

        assert_eq!(cli.mode(), Mode::Sync);
        assert_eq!(cli.config, Some(PathBuf::from("config.json")));
        assert_eq!(cli.state, Some(PathBuf::from("state.json")));
        assert_eq!(cli.catalog, Some(PathBuf::from("catalog.json")));
    }

    #[test]
    fn test_parse_discover_and_properties_alias() {
        let cli = Cli::try_parse_from(["tap-criteo", "-d", "--properties", "p.json"]).unwrap();
        assert_eq!(cli.mode(), Mode::Discover);
        assert_eq!(cli.catalog, Some(PathBuf::from("p.json")));
    }

    #[test]
    fn test_config_sources_conflict() {
        let result = Cli::try_parse_from([
            "tap-criteo",
            "--config",
            "config.json",
            "--config-json",
            "{}",
        ]);
        assert!(result.is_err());
    }
}
