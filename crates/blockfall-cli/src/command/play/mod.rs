use std::path::PathBuf;

use log::info;

use crate::{
    command::play::app::PlayApp,
    config::SessionArg,
    logging::{self, LogTarget},
    tui::Tui,
};

mod app;

const DEFAULT_LOG_FILE: &str = "blockfall.log";

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    session: SessionArg,
    /// File that receives log output while the game is running [default: blockfall.log]
    #[clap(long)]
    log_file: Option<PathBuf>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { session, log_file } = arg;

    let log_file = log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    logging::init(LogTarget::File(log_file))?;

    let mut app = PlayApp::new(session.build_session()?);
    Tui::new().run(&mut app)?;

    info!("exited with score {}", app.score());
    Ok(())
}
