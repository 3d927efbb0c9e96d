use thiserror::Error;
use vigil_core::JobError;
use vigil_model::{ProtocolError, SupervisorEndpoint};

/// Failure to get a command to a remote node and a reply back.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot connect to {target}: {message}")]
    Connect { target: String, message: String },

    #[error("request to {target} timed out")]
    Timeout { target: String },

    #[error("{target} answered {code}: {body}")]
    Status { target: String, code: u16, body: String },

    #[error("request to {target} failed: {message}")]
    Request { target: String, message: String },

    #[error("http client setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Connect { .. } => "connect",
            TransportError::Timeout { .. } => "timeout",
            TransportError::Status { .. } => "status",
            TransportError::Request { .. } => "request",
            TransportError::Setup(_) => "setup",
        }
    }

    pub(crate) fn from_reqwest(target: &SupervisorEndpoint, err: reqwest::Error) -> Self {
        let target = target.to_string();
        if err.is_timeout() {
            TransportError::Timeout { target }
        } else if err.is_connect() {
            TransportError::Connect {
                target,
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                target,
                message: err.to_string(),
            }
        }
    }
}

/// Everything a proxy call can fail with.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("job error: {0}")]
    Job(#[from] JobError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl DispatchError {
    /// Only transport failures say nothing about the job and may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_is_retryable() {
        let transport = DispatchError::from(TransportError::Timeout {
            target: "10.0.0.1:9000".into(),
        });
        assert!(transport.is_retryable());
        assert!(!DispatchError::from(ProtocolError::MissingDiscriminator).is_retryable());
        assert!(!DispatchError::from(JobError::NotFound("x".into())).is_retryable());
        assert!(!DispatchError::InvalidRequest("x".into()).is_retryable());
    }

    #[test]
    fn kinds_are_stable_labels() {
        let err = TransportError::Status {
            target: "n".into(),
            code: 502,
            body: String::new(),
        };
        assert_eq!(err.kind(), "status");
        assert_eq!(TransportError::Setup("tls".into()).kind(), "setup");
    }
}
