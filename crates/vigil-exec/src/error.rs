use thiserror::Error;
use vigil_core::JobError;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("unsupported kind for this launcher")]
    UnsupportedKind,
    #[error("missing program")]
    MissingProgram,
    #[error("no function registered for job class `{0}`")]
    FunctionNotFound(String),
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("exited before becoming ready: {0}")]
    Exited(String),
    #[error("io error: {0}")]
    Io(String),
}

pub type ExecResult<T> = Result<T, ExecError>;

impl From<std::io::Error> for ExecError {
    fn from(e: std::io::Error) -> Self {
        ExecError::Io(e.to_string())
    }
}

impl From<ExecError> for JobError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::Io(msg) => JobError::Io(msg),
            ExecError::UnsupportedKind | ExecError::MissingProgram => {
                JobError::InvalidArgument(e.to_string())
            }
            other => JobError::LaunchFailed(other.to_string()),
        }
    }
}
