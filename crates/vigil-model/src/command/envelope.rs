use serde::{Deserialize, Serialize};

/// Which side of the taxonomy a failed command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Protocol,
    Job,
}

/// Structured reply of the versioned command endpoint.
///
/// Unlike the plain-text endpoint, a `false` result and a failure are told apart
/// by `succeed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandEnvelope<T> {
    pub succeed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> CommandEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            succeed: true,
            data: Some(data),
            error_kind: None,
            message: None,
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            succeed: false,
            data: None,
            error_kind: Some(kind),
            message: Some(message.into()),
        }
    }
}
