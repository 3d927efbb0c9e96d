use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ExecutorEndpoint, JobContext, ProcessConfig, command::ProtocolError};

/// Discriminator values as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Start,
    Stop,
    Destroy,
    Modify,
    Finish,
    IsAlive,
}

impl CommandType {
    pub const ALL: [CommandType; 6] = [
        CommandType::Start,
        CommandType::Stop,
        CommandType::Destroy,
        CommandType::Modify,
        CommandType::Finish,
        CommandType::IsAlive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Start => "START",
            CommandType::Stop => "STOP",
            CommandType::Destroy => "DESTROY",
            CommandType::Modify => "MODIFY",
            CommandType::Finish => "FINISH",
            CommandType::IsAlive => "IS_ALIVE",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandType {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownCommandType(s.to_string()))
    }
}

/// Payload of `START`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTaskCommand {
    pub job_context: JobContext,
    pub process_config: ProcessConfig,
}

/// Payload shared by every command aimed at an already started executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorCommand {
    pub job_context: JobContext,
    pub executor_endpoint: ExecutorEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Start(StartTaskCommand),
    Stop(ExecutorCommand),
    Destroy(ExecutorCommand),
    Modify(ExecutorCommand),
    Finish(ExecutorCommand),
    IsAlive(ExecutorCommand),
}

impl TaskCommand {
    pub fn start(job_context: JobContext, process_config: ProcessConfig) -> Self {
        TaskCommand::Start(StartTaskCommand {
            job_context,
            process_config,
        })
    }

    /// Build a command aimed at a started executor.
    ///
    /// `START` carries a different payload and is rejected here.
    pub fn for_executor(
        command_type: CommandType,
        job_context: JobContext,
        executor_endpoint: ExecutorEndpoint,
    ) -> Result<Self, ProtocolError> {
        let payload = ExecutorCommand {
            job_context,
            executor_endpoint,
        };
        match command_type {
            CommandType::Start => Err(ProtocolError::MalformedPayload(
                "START requires a process config, not an executor endpoint".into(),
            )),
            CommandType::Stop => Ok(TaskCommand::Stop(payload)),
            CommandType::Destroy => Ok(TaskCommand::Destroy(payload)),
            CommandType::Modify => Ok(TaskCommand::Modify(payload)),
            CommandType::Finish => Ok(TaskCommand::Finish(payload)),
            CommandType::IsAlive => Ok(TaskCommand::IsAlive(payload)),
        }
    }

    pub fn command_type(&self) -> CommandType {
        match self {
            TaskCommand::Start(_) => CommandType::Start,
            TaskCommand::Stop(_) => CommandType::Stop,
            TaskCommand::Destroy(_) => CommandType::Destroy,
            TaskCommand::Modify(_) => CommandType::Modify,
            TaskCommand::Finish(_) => CommandType::Finish,
            TaskCommand::IsAlive(_) => CommandType::IsAlive,
        }
    }

    pub fn job_context(&self) -> &JobContext {
        match self {
            TaskCommand::Start(c) => &c.job_context,
            TaskCommand::Stop(c)
            | TaskCommand::Destroy(c)
            | TaskCommand::Modify(c)
            | TaskCommand::Finish(c)
            | TaskCommand::IsAlive(c) => &c.job_context,
        }
    }
}
