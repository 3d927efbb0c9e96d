use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{ExecutorEnv, Port};

/// Substrate an executor is launched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutorKind {
    /// A native OS process on the supervisor's host.
    #[default]
    Process,
    /// A function registered inside the supervisor process.
    Fn,
    /// A pod scheduled by the container orchestrator.
    Pod,
}

impl ExecutorKind {
    /// Short label used in identifiers, logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutorKind::Process => "process",
            ExecutorKind::Fn => "fn",
            ExecutorKind::Pod => "pod",
        }
    }
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "process" => Ok(ExecutorKind::Process),
            "fn" => Ok(ExecutorKind::Fn),
            "pod" => Ok(ExecutorKind::Pod),
            other => Err(format!("unknown executor kind: {other}")),
        }
    }
}

/// POSIX resource limits applied to a spawned executor process.
///
/// `None` leaves the inherited limit untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RlimitSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_open_files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size_bytes: Option<u64>,
    #[serde(default)]
    pub disable_core_dumps: bool,
}

impl RlimitSpec {
    pub fn is_empty(&self) -> bool {
        self.max_open_files.is_none()
            && self.max_file_size_bytes.is_none()
            && !self.disable_core_dumps
    }
}

/// How to launch a worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    #[serde(default)]
    pub kind: ExecutorKind,
    /// Program to execute, or the container entrypoint for pods.
    #[serde(default)]
    pub command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "ExecutorEnv::is_empty")]
    pub environments: ExecutorEnv,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    /// Container image; required for [`ExecutorKind::Pod`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
    /// Port the worker listens on once it is up, if it listens at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_port: Option<Port>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit_mb: Option<u64>,
    #[serde(default, skip_serializing_if = "RlimitSpec::is_empty")]
    pub limits: RlimitSpec,
}

impl ProcessConfig {
    /// Native process running `command args`.
    pub fn process<I, S>(command: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ExecutorKind::Process,
            command: command.into(),
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// In-process function resolved from the job's class name.
    pub fn in_process() -> Self {
        Self {
            kind: ExecutorKind::Fn,
            ..Default::default()
        }
    }

    /// Pod running `image`.
    pub fn pod(image: impl Into<String>) -> Self {
        Self {
            kind: ExecutorKind::Pod,
            image: Some(image.into()),
            ..Default::default()
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environments.push(key, value);
        self
    }

    pub fn with_executor_port(mut self, port: Port) -> Self {
        self.executor_port = Some(port);
        self
    }
}
