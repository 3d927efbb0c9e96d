use std::sync::Arc;

use async_trait::async_trait;
use vigil_model::{
    CommandType, EndpointInfo, ExecutorEndpoint, JobContext, ProcessConfig, SupervisorEndpoint, TaskCommand,
};

use super::{TaskSupervisorProxy, require_endpoint};
use crate::{CommandTransport, DispatchError};

/// Sends every call through a [`CommandTransport`].
#[derive(Clone)]
pub struct RemoteSupervisorProxy {
    transport: Arc<dyn CommandTransport>,
}

impl RemoteSupervisorProxy {
    pub fn new(transport: Arc<dyn CommandTransport>) -> Self {
        Self { transport }
    }

    async fn executor_command(
        &self,
        command_type: CommandType,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        require_endpoint(endpoint)?;
        let command = TaskCommand::for_executor(command_type, job.clone(), endpoint.clone())?;
        Ok(self.transport.send(target, &command).await?.into_flag()?)
    }
}

#[async_trait]
impl TaskSupervisorProxy for RemoteSupervisorProxy {
    async fn start_task(
        &self,
        target: &SupervisorEndpoint,
        job: &JobContext,
        config: &ProcessConfig,
    ) -> Result<ExecutorEndpoint, DispatchError> {
        let command = TaskCommand::start(job.clone(), config.clone());
        Ok(self.transport.send(target, &command).await?.into_endpoint()?)
    }

    async fn stop_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.executor_command(CommandType::Stop, target, endpoint, job).await
    }

    async fn destroy_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.executor_command(CommandType::Destroy, target, endpoint, job).await
    }

    async fn modify_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.executor_command(CommandType::Modify, target, endpoint, job).await
    }

    async fn finish_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.executor_command(CommandType::Finish, target, endpoint, job).await
    }

    async fn is_task_alive(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.executor_command(CommandType::IsAlive, target, endpoint, job).await
    }

    async fn is_supervisor_alive(&self, target: &SupervisorEndpoint) -> bool {
        self.transport.heartbeat(target).await
    }

    async fn supervisor_resources(&self, target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError> {
        self.transport.resources(target).await
    }
}
