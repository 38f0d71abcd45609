//! Logging setup.
//!
//! The library only logs through the `log` facade. Hosts that have no
//! logger of their own can route those records to a file with
//! [`init_file_logger`].

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

/// Errors from logger initialisation.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log file could not be created.
    #[error("cannot create log file: {0}")]
    Io(#[from] std::io::Error),

    /// Another logger is already installed.
    #[error("a logger is already installed: {0}")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}

/// Write log records at `level` and above to a new file at `path`.
pub fn init_file_logger(path: impl AsRef<Path>, level: LevelFilter) -> Result<(), LoggingError> {
    let log_file = File::create(path)?;
    WriteLogger::init(level, Config::default(), log_file)?;
    Ok(())
}
