use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::command::{CommandType, ProtocolError, TaskCommand};

/// Name of the field that selects the command variant.
pub const DISCRIMINATOR: &str = "commandType";

/// Serialize `command` into its JSON wire form.
pub fn encode_command(command: &TaskCommand) -> Result<String, ProtocolError> {
    let mut value = match command {
        TaskCommand::Start(c) => to_value(c)?,
        TaskCommand::Stop(c)
        | TaskCommand::Destroy(c)
        | TaskCommand::Modify(c)
        | TaskCommand::Finish(c)
        | TaskCommand::IsAlive(c) => to_value(c)?,
    };

    let obj = value
        .as_object_mut()
        .ok_or_else(|| ProtocolError::Encode("payload is not a JSON object".into()))?;
    obj.insert(
        DISCRIMINATOR.to_string(),
        Value::String(command.command_type().as_str().to_string()),
    );

    serde_json::to_string(&value).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Read only the discriminator of an already parsed payload.
pub fn read_command_type(value: &Value) -> Result<CommandType, ProtocolError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ProtocolError::MalformedPayload("payload is not a JSON object".into()))?;

    match obj.get(DISCRIMINATOR) {
        None | Some(Value::Null) => Err(ProtocolError::MissingDiscriminator),
        Some(Value::String(s)) => s.parse(),
        Some(other) => Err(ProtocolError::UnknownCommandType(other.to_string())),
    }
}

/// Decode a command: discriminator first, then the matching payload.
pub fn decode_command(body: &str) -> Result<TaskCommand, ProtocolError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;

    let command = match read_command_type(&value)? {
        CommandType::Start => TaskCommand::Start(payload(value)?),
        CommandType::Stop => TaskCommand::Stop(payload(value)?),
        CommandType::Destroy => TaskCommand::Destroy(payload(value)?),
        CommandType::Modify => TaskCommand::Modify(payload(value)?),
        CommandType::Finish => TaskCommand::Finish(payload(value)?),
        CommandType::IsAlive => TaskCommand::IsAlive(payload(value)?),
    };
    Ok(command)
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, ProtocolError> {
    serde_json::to_value(payload).map_err(|e| ProtocolError::Encode(e.to_string()))
}

fn payload<T: DeserializeOwned>(value: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
}
