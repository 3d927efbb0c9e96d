use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;
use vigil_core::{MetricsHandle, NoopMetrics, Route, TaskSupervisor};
use vigil_model::{
    CommandType, EndpointInfo, ExecutorEndpoint, JobContext, ProcessConfig, SupervisorEndpoint,
};

use super::{LocalSupervisorProxy, RemoteSupervisorProxy, TaskSupervisorProxy};
use crate::{CommandTransport, DispatchError};

/// Whether a command for `target` is served by the supervisor owning `own`.
///
/// True for the self sentinel and for `own` itself; no network is involved then.
pub fn routes_locally(own: &SupervisorEndpoint, target: &SupervisorEndpoint) -> bool {
    target.is_self() || target == own
}

/// Picks the local or remote path per call.
///
/// Commands for this process never touch the transport.
#[derive(Clone)]
pub struct Dispatcher {
    own: SupervisorEndpoint,
    local: LocalSupervisorProxy,
    remote: RemoteSupervisorProxy,
    metrics: MetricsHandle,
}

impl Dispatcher {
    pub fn new(supervisor: Arc<TaskSupervisor>, transport: Arc<dyn CommandTransport>) -> Self {
        Self {
            own: supervisor.endpoint().clone(),
            local: LocalSupervisorProxy::new(supervisor),
            remote: RemoteSupervisorProxy::new(transport),
            metrics: NoopMetrics::handle(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn own_endpoint(&self) -> &SupervisorEndpoint {
        &self.own
    }

    pub fn local(&self) -> &LocalSupervisorProxy {
        &self.local
    }

    fn route(&self, command: CommandType, target: &SupervisorEndpoint) -> &dyn TaskSupervisorProxy {
        let route = if routes_locally(&self.own, target) {
            Route::Local
        } else {
            Route::Remote
        };
        trace!(%command, %target, route = route.as_str(), "routing command");
        self.metrics.record_command(command, route);
        self.backend_for(target)
    }

    fn backend_for(&self, target: &SupervisorEndpoint) -> &dyn TaskSupervisorProxy {
        if routes_locally(&self.own, target) {
            &self.local
        } else {
            &self.remote
        }
    }
}

#[async_trait]
impl TaskSupervisorProxy for Dispatcher {
    async fn start_task(
        &self,
        target: &SupervisorEndpoint,
        job: &JobContext,
        config: &ProcessConfig,
    ) -> Result<ExecutorEndpoint, DispatchError> {
        self.route(CommandType::Start, target)
            .start_task(target, job, config)
            .await
    }

    async fn stop_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.route(CommandType::Stop, target)
            .stop_task(target, endpoint, job)
            .await
    }

    async fn destroy_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.route(CommandType::Destroy, target)
            .destroy_task(target, endpoint, job)
            .await
    }

    async fn modify_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.route(CommandType::Modify, target)
            .modify_task(target, endpoint, job)
            .await
    }

    async fn finish_task(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.route(CommandType::Finish, target)
            .finish_task(target, endpoint, job)
            .await
    }

    async fn is_task_alive(
        &self,
        target: &SupervisorEndpoint,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
    ) -> Result<bool, DispatchError> {
        self.route(CommandType::IsAlive, target)
            .is_task_alive(target, endpoint, job)
            .await
    }

    async fn is_supervisor_alive(&self, target: &SupervisorEndpoint) -> bool {
        self.backend_for(target).is_supervisor_alive(target).await
    }

    async fn supervisor_resources(&self, target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError> {
        self.backend_for(target).supervisor_resources(target).await
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use vigil_core::{JobError, LauncherRouter, MetricsBackend, LaunchOutcome};
    use vigil_exec::{FnContext, FnLauncher};
    use vigil_model::{JobIdentity, TaskCommand};

    use super::*;
    use crate::CommandReply;

    /// Answers every command with a canned reply and counts calls.
    #[derive(Default)]
    struct CountingTransport {
        sends: AtomicUsize,
        commands: Mutex<Vec<CommandType>>,
    }

    #[async_trait]
    impl CommandTransport for CountingTransport {
        async fn send(&self, target: &SupervisorEndpoint, command: &TaskCommand) -> Result<CommandReply, DispatchError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            self.commands.lock().unwrap().push(command.command_type());
            Ok(match command {
                TaskCommand::Start(c) => CommandReply::Endpoint(ExecutorEndpoint {
                    identifier: ExecutorEndpoint::identifier_for(c.process_config.kind, c.job_context.job_identity),
                    host: target.host.clone(),
                    supervisor_port: target.port,
                    executor_port: 0,
                }),
                _ => CommandReply::Flag(true),
            })
        }

        async fn heartbeat(&self, _target: &SupervisorEndpoint) -> bool {
            false
        }

        async fn resources(&self, target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError> {
            Err(JobError::NotFound(target.to_string()).into())
        }
    }

    #[derive(Default)]
    struct CommandCounter(Mutex<Vec<(CommandType, Route)>>);

    impl MetricsBackend for CommandCounter {
        fn record_command(&self, command: CommandType, route: Route) {
            self.0.lock().unwrap().push((command, route));
        }

        fn record_launch(&self, _launcher: &str, _outcome: LaunchOutcome, _elapsed: Duration) {}

        fn record_transport_error(&self, _kind: &str) {}
    }

    fn dispatcher() -> (Dispatcher, Arc<CountingTransport>, Arc<CommandCounter>) {
        let launcher = FnLauncher::new();
        launcher.register("archive", |ctx: FnContext| async move {
            ctx.cancel.cancelled().await;
            Ok(())
        });
        let router = LauncherRouter::new().with(Arc::new(launcher));
        let supervisor = Arc::new(TaskSupervisor::new(SupervisorEndpoint::new("127.0.0.1", 9000), router));
        let transport = Arc::new(CountingTransport::default());
        let metrics = Arc::new(CommandCounter::default());
        let dispatcher = Dispatcher::new(supervisor, transport.clone()).with_metrics(metrics.clone());
        (dispatcher, transport, metrics)
    }

    #[test]
    fn local_routing_predicate() {
        let own = SupervisorEndpoint::new("10.0.0.1", 9000);
        assert!(routes_locally(&own, &SupervisorEndpoint::self_endpoint()));
        assert!(routes_locally(&own, &SupervisorEndpoint::new("10.0.0.1", 9000)));
        assert!(!routes_locally(&own, &SupervisorEndpoint::new("10.0.0.1", 9001)));
        assert!(!routes_locally(&own, &SupervisorEndpoint::new("10.0.0.2", 9000)));
    }

    #[tokio::test]
    async fn local_targets_never_touch_the_transport() {
        let (dispatcher, transport, metrics) = dispatcher();
        let job = JobContext::new(JobIdentity::of(1), "archive");
        let config = ProcessConfig::in_process();

        for target in [SupervisorEndpoint::self_endpoint(), dispatcher.own_endpoint().clone()] {
            let endpoint = dispatcher.start_task(&target, &job, &config).await.unwrap();
            assert_eq!(endpoint.identifier, "fn-1");
            assert!(dispatcher.is_task_alive(&target, &endpoint, &job).await.unwrap());
            assert!(dispatcher.destroy_task(&target, &endpoint, &job).await.unwrap());
            assert!(!dispatcher.is_task_alive(&target, &endpoint, &job).await.unwrap());
        }
        assert!(dispatcher.is_supervisor_alive(&SupervisorEndpoint::self_endpoint()).await);
        assert!(dispatcher.supervisor_resources(&SupervisorEndpoint::self_endpoint()).await.is_ok());

        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);
        let recorded = metrics.0.lock().unwrap();
        assert_eq!(recorded.len(), 8);
        assert!(recorded.iter().all(|(_, route)| *route == Route::Local));
    }

    #[tokio::test]
    async fn remote_targets_go_through_the_transport() {
        let (dispatcher, transport, metrics) = dispatcher();
        let remote = SupervisorEndpoint::new("10.0.0.9", 9000);
        let job = JobContext::new(JobIdentity::of(2), "archive");

        let endpoint = dispatcher
            .start_task(&remote, &job, &ProcessConfig::in_process())
            .await
            .unwrap();
        assert_eq!(endpoint.host, "10.0.0.9");
        assert!(dispatcher.finish_task(&remote, &endpoint, &job).await.unwrap());
        assert!(!dispatcher.is_supervisor_alive(&remote).await);

        assert_eq!(transport.sends.load(Ordering::SeqCst), 2);
        assert_eq!(
            *transport.commands.lock().unwrap(),
            vec![CommandType::Start, CommandType::Finish]
        );
        assert!(metrics.0.lock().unwrap().iter().all(|(_, route)| *route == Route::Remote));
        assert!(dispatcher.local().supervisor().executors().is_empty());
    }

    #[tokio::test]
    async fn blank_identifier_fails_before_dispatch() {
        let (dispatcher, transport, _) = dispatcher();
        let job = JobContext::new(JobIdentity::of(3), "archive");
        let blank = ExecutorEndpoint {
            identifier: "  ".into(),
            host: "10.0.0.9".into(),
            supervisor_port: 9000,
            executor_port: 0,
        };

        for target in [SupervisorEndpoint::self_endpoint(), SupervisorEndpoint::new("10.0.0.9", 9000)] {
            let err = dispatcher.stop_task(&target, &blank, &job).await.unwrap_err();
            assert!(matches!(err, DispatchError::InvalidRequest(_)));
            assert!(!err.is_retryable());
        }
        assert_eq!(transport.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn await_stopped_polls_until_dead() {
        let (dispatcher, _, _) = dispatcher();
        let me = SupervisorEndpoint::self_endpoint();
        let job = JobContext::new(JobIdentity::of(4), "archive");
        let endpoint = dispatcher
            .start_task(&me, &job, &ProcessConfig::in_process())
            .await
            .unwrap();

        assert!(dispatcher.stop_task(&me, &endpoint, &job).await.unwrap());
        let stopped = dispatcher
            .await_stopped(&me, &endpoint, &job, Duration::from_secs(2), Duration::from_millis(10))
            .await
            .unwrap();
        assert!(stopped);
    }
}
