//! One interface for commanding any supervisor, local or remote.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use vigil_model::{EndpointInfo, ExecutorEndpoint, JobContext, ProcessConfig, SupervisorEndpoint};

use crate::DispatchError;

mod dispatcher;
mod local;
mod remote;

pub use dispatcher::{Dispatcher, routes_locally};
pub use local::LocalSupervisorProxy;
pub use remote::RemoteSupervisorProxy;

/// Commands addressed to the supervisor at `target`.
///
/// Failures keep their class: [`DispatchError::Transport`] says nothing about
/// the job and may be retried, a protocol or job error must not be.
#[async_trait]
pub trait TaskSupervisorProxy: Send + Sync {
    async fn start_task(
        &self,
        target: &SupervisorEndpoint,
        job: &JobContext,
        config: &ProcessConfig,
    ) -> Result<ExecutorEndpoint, DispatchError>;

    async fn stop_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError>;

    async fn destroy_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError>;

    async fn modify_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError>;

    async fn finish_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError>;

    async fn is_task_alive(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError>;

    /// Reachability of the node itself; unreachable reads as `false`.
    async fn is_supervisor_alive(&self, target: &SupervisorEndpoint) -> bool;

    async fn supervisor_resources(&self, target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError>;

    /// Poll [`is_task_alive`](Self::is_task_alive) until it reports `false` or
    /// `timeout` elapses. Returns whether the executor stopped.
    async fn await_stopped(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
        timeout: Duration,
        interval: Duration,
    ) -> Result<bool, DispatchError> {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_task_alive(target, endpoint, job).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(interval).await;
        }
    }
}

pub(crate) fn require_endpoint(endpoint: &ExecutorEndpoint) -> Result<(), DispatchError> {
    if endpoint.identifier.trim().is_empty() {
        return Err(DispatchError::InvalidRequest("executor endpoint has no identifier".into()));
    }
    Ok(())
}
