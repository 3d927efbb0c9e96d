use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("unknown log format `{0}`; use text, json or journald")]
    UnknownFormat(String),

    #[error("journald output needs linux and the `journald` feature")]
    JournaldUnavailable,

    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("a global logger is already installed")]
    AlreadyInitialized,

    #[error("cannot reach journald: {0}")]
    Journald(#[from] std::io::Error),

    #[error("logger setup failed: {0}")]
    Setup(String),
}
