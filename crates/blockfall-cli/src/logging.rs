use std::{fs::File, path::PathBuf};

use anyhow::Context as _;

#[derive(Debug, Clone)]
pub(crate) enum LogTarget {
    Stderr,
    /// Used while the TUI owns the terminal.
    File(PathBuf),
}

/// Installs the global logger. The filter comes from `RUST_LOG` and defaults to `info`.
pub(crate) fn init(target: LogTarget) -> anyhow::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    builder.format_module_path(false);
    match target {
        LogTarget::Stderr => {
            builder.format_timestamp(None);
        }
        LogTarget::File(path) => {
            let file = File::create(&path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            builder
                .format_timestamp_millis()
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    builder.try_init().context("Failed to install logger")?;
    Ok(())
}
