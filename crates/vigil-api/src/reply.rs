use serde::Serialize;
use serde_json::Value;
use vigil_core::JobError;
use vigil_model::{CommandEnvelope, CommandType, ErrorKind, ExecutorEndpoint, ProtocolError};

use crate::error::{DispatchError, TransportError};

/// Result of a successfully executed command.
///
/// `START` answers with the executor endpoint, everything else with a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandReply {
    Endpoint(ExecutorEndpoint),
    Flag(bool),
}

impl CommandReply {
    pub fn into_endpoint(self) -> Result<ExecutorEndpoint, ProtocolError> {
        match self {
            CommandReply::Endpoint(endpoint) => Ok(endpoint),
            CommandReply::Flag(flag) => Err(ProtocolError::MalformedResponse(format!(
                "expected an executor endpoint, got `{flag}`"
            ))),
        }
    }

    pub fn into_flag(self) -> Result<bool, ProtocolError> {
        match self {
            CommandReply::Flag(flag) => Ok(flag),
            CommandReply::Endpoint(endpoint) => Err(ProtocolError::MalformedResponse(format!(
                "expected a boolean, got endpoint {endpoint}"
            ))),
        }
    }

    /// Interpret envelope `data` for a command of `command_type`.
    pub fn from_value(command_type: CommandType, data: Value) -> Result<Self, ProtocolError> {
        match command_type {
            CommandType::Start => serde_json::from_value(data)
                .map(CommandReply::Endpoint)
                .map_err(|e| ProtocolError::MalformedResponse(e.to_string())),
            _ => match data {
                Value::Bool(flag) => Ok(CommandReply::Flag(flag)),
                other => Err(ProtocolError::MalformedResponse(format!(
                    "expected a boolean, got {other}"
                ))),
            },
        }
    }

    /// Plain-text body used by the unversioned endpoint.
    pub fn to_legacy_body(&self) -> Result<String, ProtocolError> {
        match self {
            CommandReply::Endpoint(endpoint) => {
                serde_json::to_string(endpoint).map_err(|e| ProtocolError::Encode(e.to_string()))
            }
            CommandReply::Flag(flag) => Ok(flag.to_string()),
        }
    }
}

/// Decode a body returned by the unversioned endpoint.
///
/// That endpoint answers `200` even on failure, with the error message as the
/// body. Whatever is neither the expected value nor a boolean is therefore
/// reported as a remote job failure carrying that body.
pub fn decode_legacy_reply(command_type: CommandType, body: &str) -> Result<CommandReply, DispatchError> {
    let trimmed = body.trim();
    if command_type == CommandType::Start {
        return serde_json::from_str::<ExecutorEndpoint>(trimmed)
            .map(CommandReply::Endpoint)
            .map_err(|_| JobError::Remote(trimmed.to_string()).into());
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => Ok(CommandReply::Flag(true)),
        "false" => Ok(CommandReply::Flag(false)),
        _ => Err(JobError::Remote(trimmed.to_string()).into()),
    }
}

/// Decode a reply of the versioned endpoint.
///
/// `target` and `status` are only used to report bodies that are not an
/// envelope at all, e.g. a proxy error page.
pub fn decode_envelope_reply(
    command_type: CommandType,
    target: &str,
    status: u16,
    body: &str,
) -> Result<CommandReply, DispatchError> {
    let envelope: CommandEnvelope<Value> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !(200..300).contains(&status) && status != 400 => {
            return Err(TransportError::Status {
                target: target.to_string(),
                code: status,
                body: body.to_string(),
            }
            .into());
        }
        Err(e) => return Err(ProtocolError::MalformedResponse(e.to_string()).into()),
    };

    if envelope.succeed {
        let data = envelope.data.unwrap_or(Value::Null);
        return Ok(CommandReply::from_value(command_type, data)?);
    }

    let message = envelope.message.unwrap_or_default();
    match envelope.error_kind {
        Some(ErrorKind::Protocol) => Err(ProtocolError::MalformedPayload(format!(
            "rejected by {target}: {message}"
        ))
        .into()),
        Some(ErrorKind::Job) | None => Err(JobError::Remote(message).into()),
    }
}
