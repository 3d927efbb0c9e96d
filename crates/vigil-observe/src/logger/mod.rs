mod config;
mod error;
mod format;
mod install;
mod level;

pub use config::LoggerConfig;
pub use error::LoggerError;
pub use format::LoggerFormat;
pub use level::LoggerLevel;

/// Install the global subscriber described by `cfg`.
///
/// Fails with [`LoggerError::AlreadyInitialized`] on a second call, and with
/// [`LoggerError::JournaldUnavailable`] when this build has no journald output.
pub fn init_logger(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    install::install(cfg)
}
