use thiserror::Error;
use vigil_core::JobError;

const ALREADY_EXISTS_CODE: u16 = 409;
const NOT_FOUND_CODE: u16 = 404;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("orchestrator answered {code}: {body}")]
    Status { code: u16, body: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode orchestrator response: {0}")]
    Decode(String),

    #[error("orchestrator is not configured: {0}")]
    NotConfigured(String),
}

impl OrchestratorError {
    /// The create collided with an existing resource of the same name.
    pub fn is_already_exists(&self) -> bool {
        match self {
            OrchestratorError::Status { code, body } => {
                *code == ALREADY_EXISTS_CODE || body.to_ascii_lowercase().contains("already exists")
            }
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OrchestratorError::Status { code, .. } if *code == NOT_FOUND_CODE)
    }
}

impl From<OrchestratorError> for JobError {
    fn from(e: OrchestratorError) -> Self {
        JobError::Orchestrator(e.to_string())
    }
}
