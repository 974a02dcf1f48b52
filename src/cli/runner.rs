//! CLI runner - executes a discover or sync run

use crate::catalog::{discover, Catalog};
use crate::cli::commands::{Cli, Mode};
use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine, SyncStats};
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use crate::output::SingerWriter;
use crate::source::CriteoClient;
use crate::state::StateManager;
use chrono::Utc;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing Singer messages to stdout
    pub async fn run(&self) -> Result<()> {
        match self.cli.mode() {
            Mode::Discover => self.discover_to(&mut std::io::stdout()),
            Mode::Sync => self.sync_to(std::io::stdout()).await.map(|_| ()),
        }
    }

    /// Write the discovered catalog as pretty JSON
    pub fn discover_to<W: Write>(&self, out: &mut W) -> Result<()> {
        info!("Starting discover");
        let catalog = discover()?;
        writeln!(out, "{}", catalog.to_json_pretty()?).context("failed to write catalog")?;
        info!(streams = catalog.streams.len(), "Finished discover");
        Ok(())
    }

    /// Sync the selected streams of the catalog into `out`
    pub async fn sync_to<W: Write + Send>(&self, out: W) -> Result<SyncStats> {
        let config = self.load_config()?;
        let catalog = self.load_catalog()?;
        let state = self.load_state()?;

        let http = HttpClient::with_config(config.http_config())?;
        let client = CriteoClient::new(http, config.token_url(), config.credentials());
        let sync_config = SyncConfig::from_tap_config(&config, Utc::now().date_naive())?;

        info!(
            start_date = %sync_config.start_date,
            end_date = %sync_config.end_date,
            conversion_window_days = sync_config.conversion_window_days,
            "Starting sync"
        );

        let mut engine = SyncEngine::new(client, SingerWriter::new(out), state, sync_config);
        let stats = engine.sync_catalog(&catalog).await?;

        info!(
            streams = stats.streams_synced,
            skipped = stats.streams_skipped,
            days = stats.days_fetched,
            records = stats.records_synced,
            duration_ms = stats.duration_ms,
            "Finished sync"
        );
        Ok(stats)
    }

    /// Load configuration
    fn load_config(&self) -> Result<TapConfig> {
        // Inline config takes precedence
        if let Some(json) = &self.cli.config_json {
            return TapConfig::from_json(json);
        }
        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config("--config or --config-json is required")),
        }
    }

    /// Load the catalog
    fn load_catalog(&self) -> Result<Catalog> {
        match &self.cli.catalog {
            Some(path) => Catalog::from_file(path),
            None => Err(Error::catalog("--catalog is required to sync")),
        }
    }

    /// Load state
    fn load_state(&self) -> Result<StateManager> {
        // Inline state takes precedence
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }
}
