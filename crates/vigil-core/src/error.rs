use thiserror::Error;

/// Domain failure of a job operation.
///
/// Launch problems are reported, never retried here; retry policy belongs to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no launcher supports executor kind `{0}`")]
    NoLauncher(String),
    #[error("launch failed: {0}")]
    LaunchFailed(String),
    #[error("executor not ready after {waited_ms} ms: {reason}")]
    NotReady { waited_ms: u64, reason: String },
    #[error("executor not found: {0}")]
    NotFound(String),
    #[error("orchestrator error: {0}")]
    Orchestrator(String),
    #[error("remote supervisor reported: {0}")]
    Remote(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for JobError {
    fn from(e: std::io::Error) -> Self {
        JobError::Io(e.to_string())
    }
}
