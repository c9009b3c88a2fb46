pub mod console;
pub mod tail;

use eyre::{eyre, Result};
use simplelog::{
    ColorChoice, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::path::Path;

fn log_level() -> LevelFilter {
    std::env::var("AUTOSEC_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// File logger for the console, which owns the terminal.
pub(crate) fn init_file_logger(path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| eyre!("Cannot create log file {}: {}", path.display(), e))?;
    WriteLogger::init(log_level(), Config::default(), file)
        .map_err(|e| eyre!("Cannot install logger: {}", e))
}

/// Terminal logger on stderr, leaving stdout to the event stream.
pub(crate) fn init_term_logger() -> Result<()> {
    TermLogger::init(
        log_level(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| eyre!("Cannot install logger: {}", e))
}
