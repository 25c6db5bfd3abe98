use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{GameSession, PieceSeed, SessionConfig};

use crate::util;

/// Session options shared by every mode.
///
/// Values are layered: defaults, then the JSON file given by `--config`, then
/// individual flags.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SessionArg {
    /// Session config file (JSON)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Board width in cells
    #[clap(long)]
    cols: Option<usize>,
    /// Board height in cells
    #[clap(long)]
    rows: Option<usize>,
    /// Milliseconds between automatic drops
    #[clap(long)]
    drop_interval_ms: Option<u64>,
    /// Seed for the piece sequence (32 hex digits); random if omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl SessionArg {
    pub(crate) fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("session config", path)?,
            None => SessionConfig::default(),
        };
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(drop_interval_ms) = self.drop_interval_ms {
            config.drop_interval_ms = drop_interval_ms;
        }
        config.validate().context("Invalid session config")?;
        Ok(config)
    }

    pub(crate) fn build_session(&self) -> anyhow::Result<GameSession> {
        let config = self.session_config()?;
        let session = match self.seed {
            Some(seed) => GameSession::with_seed(config, seed)?,
            None => GameSession::new(config)?,
        };
        Ok(session)
    }
}
