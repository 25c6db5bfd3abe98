use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::{SessionEvent, parse_script};
use log::info;

use crate::{
    config::SessionArg,
    logging::{self, LogTarget},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    session: SessionArg,
    /// Whitespace-separated commands, e.g. "start left cw tick:500 drop"
    #[clap(long, conflicts_with = "script_file")]
    script: Option<String>,
    /// File containing the command script
    #[clap(long)]
    script_file: Option<PathBuf>,
    /// Output file for the final snapshot (default: stdout)
    #[clap(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        session,
        script,
        script_file,
        output,
    } = arg;

    logging::init(LogTarget::Stderr)?;

    let script = match (script, script_file) {
        (Some(script), _) => script.clone(),
        (None, Some(path)) => util::read_text_file("command script", path)?,
        (None, None) => String::new(),
    };
    let commands = parse_script(&script).context("Failed to parse command script")?;

    let mut session = session.build_session()?;
    let mut cleared_rows_total = 0;
    for command in &commands {
        for event in session.apply(*command) {
            if let SessionEvent::PieceLocked { cleared_rows, .. } = event {
                cleared_rows_total += cleared_rows;
            }
        }
    }
    info!(
        "applied {} commands, cleared {} rows, final state {:?}",
        commands.len(),
        cleared_rows_total,
        session.state()
    );

    Output::save_json(&session.snapshot(), output.clone())
}
