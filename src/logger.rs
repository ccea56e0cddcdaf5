//! Logger initialisation for executables using this crate.

use thiserror::Error;

pub use log::LevelFilter;

/// The environment variable that overrides the default log level.
pub const LOG_LEVEL_ENV: &str = "ACC_SIM_LOG";

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Unrecognised log level `{0}`")]
    InvalidLevel(String),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(#[from] log::SetLoggerError),
}

/// Reads the log level from [LOG_LEVEL_ENV], falling back to `default`.
pub fn level_from_env(default: LevelFilter) -> Result<LevelFilter, LoggerInitError> {
    match std::env::var(LOG_LEVEL_ENV) {
        Ok(level) => level
            .parse()
            .map_err(|_| LoggerInitError::InvalidLevel(level)),
        Err(_) => Ok(default),
    }
}

/// Initialise the logger, writing to stderr.
///
/// This function must only be called once per process.
pub fn logger_init(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:5} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(min_level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}
