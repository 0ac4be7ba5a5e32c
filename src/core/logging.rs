//! Logging initialization
//!
//! Console logging is always on; a log file is added when `log_file` is
//! configured. Chatty dependency targets are filtered out.

use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::str::FromStr;

use super::error::{AppError, AppResult};

/// Initialize logger for console and (optionally) file output
///
/// # Arguments
/// * `level` - Level name (`error`, `warn`, `info`, `debug`, `trace`)
/// * `log_file_path` - Optional path to the log file; truncated on startup
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(AppError)` - Bad level name, unwritable file, or logger already set
pub fn init_logger(level: &str, log_file_path: Option<&str>) -> AppResult<()> {
    let level = parse_level(level)?;

    let config = ConfigBuilder::new()
        // chromiumoxide logs every CDP message it cannot deserialize
        .add_filter_ignore_str("chromiumoxide")
        .add_filter_ignore_str("hyper")
        .add_filter_ignore_str("reqwest")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(level, config.clone(), TerminalMode::Mixed, ColorChoice::Auto));

    if let Some(path) = log_file_path {
        let log_file = File::create(path)?;
        loggers.push(WriteLogger::new(level, config, log_file));
    }

    CombinedLogger::init(loggers).map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))?;

    Ok(())
}

/// Parses a level name, case-insensitively.
pub fn parse_level(level: &str) -> AppResult<LevelFilter> {
    LevelFilter::from_str(level.trim()).map_err(|_| AppError::Logger(format!("Unknown log level: {}", level)))
}
