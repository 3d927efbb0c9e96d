//! Seam between the supervisor and the substrates that actually run workers.
//!
//! A [`Launcher`] turns a launch request into an [`ExecutorHandle`]; the
//! supervisor owns the handle from then on and only talks to the worker
//! through it.

use std::time::Duration;

use async_trait::async_trait;
use vigil_model::{ExecutorEnv, JobContext, Port, ProcessConfig};

use crate::JobError;

pub const ENV_JOB_IDENTITY: &str = "VIGIL_JOB_IDENTITY";
pub const ENV_JOB_CLASS: &str = "VIGIL_JOB_CLASS";
pub const ENV_EXECUTOR_ID: &str = "VIGIL_EXECUTOR_ID";

/// Input of a single launch.
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    /// Identifier the resulting executor endpoint will carry.
    pub identifier: &'a str,
    pub job: &'a JobContext,
    pub config: &'a ProcessConfig,
    /// Host the supervisor advertises; local launchers report it as the worker's host.
    pub host: &'a str,
}

impl LaunchRequest<'_> {
    /// Environment for the worker: job coordinates first, then the config's
    /// own entries, which win on conflict.
    pub fn environment(&self) -> ExecutorEnv {
        ExecutorEnv::new()
            .with(ENV_JOB_IDENTITY, self.job.job_identity.to_string())
            .with(ENV_JOB_CLASS, self.job.job_class.as_str())
            .with(ENV_EXECUTOR_ID, self.identifier)
            .merged(&self.config.environments)
    }
}

/// How long and how often to check a fresh worker before giving up on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ReadyPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
        }
    }
}

/// Where a ready worker can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorAddress {
    pub host: String,
    /// `0` when the worker does not listen.
    pub port: Port,
}

/// Live worker owned by the supervisor.
#[async_trait]
pub trait ExecutorHandle: Send + Sync {
    /// Wait until the worker is minimally reachable and report its address.
    async fn wait_ready(&self, policy: &ReadyPolicy) -> Result<ExecutorAddress, JobError>;

    /// Cheap liveness check; never fails, an unreachable worker is simply dead.
    async fn is_alive(&self) -> bool;

    /// Ask the worker to stop. Returns once the request is delivered.
    async fn request_stop(&self) -> Result<(), JobError>;

    /// Terminate the worker without waiting for its cooperation.
    async fn kill(&self) -> Result<(), JobError>;
}

/// Something that can start workers of one or more executor kinds.
#[async_trait]
pub trait Launcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, config: &ProcessConfig) -> bool;

    async fn launch(&self, request: &LaunchRequest<'_>) -> Result<Box<dyn ExecutorHandle>, JobError>;
}
