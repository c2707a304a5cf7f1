//! Optional log sink for applications embedding the SDK.
//!
//! The SDK itself only talks to the `log` facade. Applications that have no
//! logger of their own can install this one: colored stdout plus a plain
//! text file, both with RFC 3339 timestamps.

use crate::error::LoggerError;

use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Set once a dispatcher has been applied.
static LOGGER_INITIALIZED: Mutex<bool> = Mutex::new(false);

/// Log file name.
pub const LOG_FILE_NAME: &str = "bankly.log";

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Default log level for debug builds.
#[cfg(debug_assertions)]
pub const LOG_LEVEL: LevelFilter = LevelFilter::Debug;

/// Default log level for release builds.
#[cfg(not(debug_assertions))]
pub const LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Install the stdout + file logger at [`LOG_LEVEL`].
///
/// Safe to call more than once: later calls log a warning and return `Ok`.
/// A failed call leaves nothing installed, so it may be retried.
///
/// # Errors
///
/// - [`LoggerError::LogFile`] if `log_dir/bankly.log` cannot be opened
/// - [`LoggerError::Init`] if another global logger is already set
pub fn initialize(log_dir: &Path) -> Result<(), LoggerError> {
    initialize_with_level(log_dir, LOG_LEVEL)
}

pub fn initialize_with_level(log_dir: &Path, level: LevelFilter) -> Result<(), LoggerError> {
    let mut initialized = LOGGER_INITIALIZED
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if *initialized {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    dispatch(log_dir, level)?
        .apply()
        .map_err(|e| LoggerError::init(format!("Failed to initialize logger: {e}")))?;

    *initialized = true;
    info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");

    Ok(())
}

/// Path of the log file inside `log_dir`.
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Build the dual dispatcher without installing it. Opens the log file.
#[track_caller]
pub(crate) fn dispatch(log_dir: &Path, level: LevelFilter) -> Result<Dispatch, LoggerError> {
    let log_file_path = log_file_path(log_dir);

    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stdout_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{target}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                target = record.target(),
            ))
        })
        .chain(stdout());

    // Plain text, no colors
    let file_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = record.level(),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0)
            ))
        })
        .chain(fern::log_file(&log_file_path).map_err(|e| {
            LoggerError::log_file(format!(
                "Failed to create log file {}: {e}",
                log_file_path.display()
            ))
        })?);

    Ok(Dispatch::new()
        .level(level)
        .chain(stdout_dispatch)
        .chain(file_dispatch))
}
