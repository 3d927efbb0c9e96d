use std::sync::Arc;

use async_trait::async_trait;
use vigil_core::{JobError, TaskSupervisor};
use vigil_model::{EndpointInfo, ExecutorEndpoint, JobContext, ProcessConfig, SupervisorEndpoint, TaskCommand};

use super::{TaskSupervisorProxy, require_endpoint};
use crate::{CommandReply, DispatchError};

/// Calls straight into the supervisor of this process; `target` is ignored.
#[derive(Clone)]
pub struct LocalSupervisorProxy {
    supervisor: Arc<TaskSupervisor>,
}

impl LocalSupervisorProxy {
    pub fn new(supervisor: Arc<TaskSupervisor>) -> Self {
        Self { supervisor }
    }

    pub fn supervisor(&self) -> &Arc<TaskSupervisor> {
        &self.supervisor
    }

    /// Run a decoded command against the local supervisor.
    pub async fn execute(&self, command: TaskCommand) -> Result<CommandReply, JobError> {
        let sup = &self.supervisor;
        match command {
            TaskCommand::Start(c) => sup
                .start_task(&c.job_context, &c.process_config)
                .await
                .map(CommandReply::Endpoint),
            TaskCommand::Stop(c) => sup
                .request_stop(&c.executor_endpoint, &c.job_context)
                .await
                .map(CommandReply::Flag),
            TaskCommand::Destroy(c) => sup
                .destroy_task(&c.executor_endpoint, &c.job_context)
                .await
                .map(CommandReply::Flag),
            TaskCommand::Modify(c) => sup
                .modify_task(&c.executor_endpoint, &c.job_context)
                .await
                .map(CommandReply::Flag),
            TaskCommand::Finish(c) => sup
                .finish_task(&c.executor_endpoint, &c.job_context)
                .await
                .map(CommandReply::Flag),
            TaskCommand::IsAlive(c) => Ok(CommandReply::Flag(
                sup.is_task_alive(&c.executor_endpoint, &c.job_context).await,
            )),
        }
    }
}

#[async_trait]
impl TaskSupervisorProxy for LocalSupervisorProxy {
    async fn start_task(
        &self,
        _target: &SupervisorEndpoint,
        job: &JobContext,
        config: &ProcessConfig,
    ) -> Result<ExecutorEndpoint, DispatchError> {
        Ok(self.supervisor.start_task(job, config).await?)
    }

    async fn stop_task(
        &self,
        _target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        require_endpoint(endpoint)?;
        Ok(self.supervisor.request_stop(endpoint, job).await?)
    }

    async fn destroy_task(
        &self,
        _target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        require_endpoint(endpoint)?;
        Ok(self.supervisor.destroy_task(endpoint, job).await?)
    }

    async fn modify_task(
        &self,
        _target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        require_endpoint(endpoint)?;
        Ok(self.supervisor.modify_task(endpoint, job).await?)
    }

    async fn finish_task(
        &self,
        _target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        require_endpoint(endpoint)?;
        Ok(self.supervisor.finish_task(endpoint, job).await?)
    }

    async fn is_task_alive(
        &self,
        _target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        require_endpoint(endpoint)?;
        Ok(self.supervisor.is_task_alive(endpoint, job).await)
    }

    async fn is_supervisor_alive(&self, _target: &SupervisorEndpoint) -> bool {
        true
    }

    async fn supervisor_resources(&self, _target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError> {
        Ok(self.supervisor.endpoint_info())
    }
}
