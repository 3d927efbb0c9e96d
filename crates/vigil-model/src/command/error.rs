use thiserror::Error;

/// The peer spoke a dialect we do not understand.
///
/// Usually a version mismatch between supervisors; retrying the same bytes
/// will not help.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("command payload has no `commandType` discriminator")]
    MissingDiscriminator,
    #[error("unrecognized command type: {0}")]
    UnknownCommandType(String),
    #[error("malformed command payload: {0}")]
    MalformedPayload(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("failed to encode command: {0}")]
    Encode(String),
}
