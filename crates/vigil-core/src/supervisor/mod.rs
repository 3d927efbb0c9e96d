//! Local executor manager.
//!
//! [`TaskSupervisor`] owns every worker started on its node: it picks a
//! launcher, waits for the worker to become reachable, keeps the handle in the
//! [`ExecutorRegistry`] and tears it down again on request.

use std::{
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};

use tracing::{debug, info, instrument, warn};
use vigil_model::{EndpointInfo, ExecutorEndpoint, JobContext, JobIdentity, ProcessConfig, SupervisorEndpoint};

use crate::{
    JobError,
    launcher::{ExecutorHandle, LaunchRequest, ReadyPolicy},
    metrics::{LaunchOutcome, MetricsHandle, NoopMetrics},
    registry::{ExecutorRegistry, ExecutorSlot, RegisteredExecutor},
    router::LauncherRouter,
    system,
};

/// Timing knobs of a supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Upper bound for a fresh worker to become reachable.
    pub ready_timeout: Duration,
    pub ready_poll_interval: Duration,
    /// How long a destroy waits for a graceful exit before killing.
    pub stop_grace: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(30),
            ready_poll_interval: Duration::from_millis(200),
            stop_grace: Duration::from_secs(5),
        }
    }
}

impl SupervisorConfig {
    pub fn ready_policy(&self) -> ReadyPolicy {
        ReadyPolicy {
            timeout: self.ready_timeout,
            poll_interval: self.ready_poll_interval,
        }
    }
}

pub struct TaskSupervisor {
    endpoint: SupervisorEndpoint,
    host: String,
    router: LauncherRouter,
    registry: ExecutorRegistry,
    config: SupervisorConfig,
    metrics: MetricsHandle,
}

impl TaskSupervisor {
    /// Supervisor reachable at `endpoint`, launching through `router`.
    pub fn new(endpoint: SupervisorEndpoint, router: LauncherRouter) -> Self {
        let host = launch_host(&endpoint);
        Self {
            endpoint,
            host,
            router,
            registry: ExecutorRegistry::new(),
            config: SupervisorConfig::default(),
            metrics: NoopMetrics::handle(),
        }
    }

    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn endpoint(&self) -> &SupervisorEndpoint {
        &self.endpoint
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ExecutorRegistry {
        &self.registry
    }

    /// Start a worker for `job`, or return the one already running for it.
    ///
    /// Concurrent starts of one job are serialised; the loser observes the
    /// winner's executor. A failed start leaves nothing registered.
    #[instrument(level = "info", skip(self, job, config), fields(job = %job.job_identity, kind = %config.kind))]
    pub async fn start_task(&self, job: &JobContext, config: &ProcessConfig) -> Result<ExecutorEndpoint, JobError> {
        let started = Instant::now();
        let identity = job.job_identity;
        let slot = self.registry.slot(identity);

        let result = {
            let _gate = slot.lock().await;
            self.start_locked(&slot, job, config).await
        };
        drop(slot);

        match result {
            Ok((endpoint, launcher, outcome)) => {
                self.metrics.record_launch(launcher, outcome, started.elapsed());
                Ok(endpoint)
            }
            Err((launcher, err)) => {
                self.metrics
                    .record_launch(launcher, LaunchOutcome::Failed, started.elapsed());
                self.registry.prune(identity);
                warn!(error = %err, "start failed");
                Err(err)
            }
        }
    }

    async fn start_locked(
        &self,
        slot: &ExecutorSlot,
        job: &JobContext,
        config: &ProcessConfig,
    ) -> Result<(ExecutorEndpoint, &'static str, LaunchOutcome), (&'static str, JobError)> {
        if let Some(existing) = slot.current() {
            if existing.handle.is_alive().await {
                debug!(identifier = %existing.endpoint.identifier, "executor already running");
                return Ok((existing.endpoint.clone(), existing.launcher, LaunchOutcome::Reused));
            }
            info!(identifier = %existing.endpoint.identifier, "dropping dead executor before relaunch");
            slot.clear();
        }

        let launcher = self
            .router
            .pick(config)
            .map_err(|e| (config.kind.as_str(), e))?;
        let name = launcher.name();

        let identifier = ExecutorEndpoint::identifier_for(config.kind, job.job_identity);
        let request = LaunchRequest {
            identifier: &identifier,
            job,
            config,
            host: &self.host,
        };
        let handle: Arc<dyn ExecutorHandle> = Arc::from(launcher.launch(&request).await.map_err(|e| (name, e))?);

        let address = match handle.wait_ready(&self.config.ready_policy()).await {
            Ok(address) => address,
            Err(err) => {
                if let Err(kill_err) = handle.kill().await {
                    warn!(error = %kill_err, "failed to kill executor that never became ready");
                }
                return Err((name, err));
            }
        };

        let endpoint = ExecutorEndpoint {
            identifier,
            host: address.host,
            supervisor_port: self.endpoint.port,
            executor_port: address.port,
        };
        slot.set(RegisteredExecutor {
            endpoint: endpoint.clone(),
            job: job.clone(),
            launcher: name,
            handle,
            started_at: SystemTime::now(),
        });
        info!(executor = %endpoint, launcher = name, "executor started");
        Ok((endpoint, name, LaunchOutcome::Started))
    }

    /// Ask the worker to stop without waiting for it; the registration stays.
    ///
    /// Returns `false` when `endpoint` is not registered for `job`.
    #[instrument(level = "debug", skip(self, endpoint, job), fields(job = %job.job_identity, identifier = %endpoint.identifier))]
    pub async fn request_stop(&self, endpoint: &ExecutorEndpoint, job: &JobContext) -> Result<bool, JobError> {
        require_identifier(endpoint)?;
        let Some(entry) = self
            .registry
            .get_matching(job.job_identity, &endpoint.identifier)
        else {
            return Ok(false);
        };
        entry.handle.request_stop().await?;
        Ok(true)
    }

    /// Graceful stop, bounded wait, forced kill, unregister.
    ///
    /// `true` means the handle is gone from the registry, not that the worker
    /// has exited; poll [`is_task_alive`](Self::is_task_alive) for that.
    /// Destroying something that is not registered is a no-op returning `true`.
    /// An endpoint that does not match the executor registered for `job` is
    /// [`JobError::NotFound`] and leaves that executor running.
    #[instrument(level = "info", skip(self, endpoint, job), fields(job = %job.job_identity, identifier = %endpoint.identifier))]
    pub async fn destroy_task(&self, endpoint: &ExecutorEndpoint, job: &JobContext) -> Result<bool, JobError> {
        require_identifier(endpoint)?;
        let identity = job.job_identity;
        let Some(slot) = self.registry.existing_slot(identity) else {
            debug!("nothing registered; destroy is a no-op");
            return Ok(true);
        };

        let outcome = {
            let _gate = slot.lock().await;
            match slot.current() {
                Some(entry) if entry.endpoint.identifier == endpoint.identifier => {
                    self.terminate(&entry).await;
                    slot.clear();
                    info!("executor destroyed");
                    Ok(true)
                }
                Some(entry) => {
                    warn!(registered = %entry.endpoint.identifier, "registered executor differs; left untouched");
                    Err(JobError::NotFound(format!(
                        "job {identity} runs executor `{}`, not `{}`",
                        entry.endpoint.identifier, endpoint.identifier
                    )))
                }
                None => {
                    debug!("slot already empty");
                    Ok(true)
                }
            }
        };
        drop(slot);
        self.registry.prune(identity);
        outcome
    }

    async fn terminate(&self, entry: &RegisteredExecutor) {
        if let Err(e) = entry.handle.request_stop().await {
            warn!(error = %e, "graceful stop request failed");
        }
        if poll_until_stopped(entry.handle.as_ref(), self.config.stop_grace, self.config.ready_poll_interval).await {
            return;
        }
        warn!(grace_ms = self.config.stop_grace.as_millis() as u64, "executor ignored stop; killing");
        if let Err(e) = entry.handle.kill().await {
            warn!(error = %e, "kill failed; unregistering anyway");
        }
    }

    /// Replace the job context of a live, registered executor.
    #[instrument(level = "debug", skip(self, endpoint, job), fields(job = %job.job_identity, identifier = %endpoint.identifier))]
    pub async fn modify_task(&self, endpoint: &ExecutorEndpoint, job: &JobContext) -> Result<bool, JobError> {
        require_identifier(endpoint)?;
        let Some(slot) = self.registry.existing_slot(job.job_identity) else {
            return Ok(false);
        };
        let _gate = slot.lock().await;
        let Some(entry) = slot
            .current()
            .filter(|e| e.endpoint.identifier == endpoint.identifier)
        else {
            return Ok(false);
        };
        if !entry.handle.is_alive().await {
            return Ok(false);
        }
        slot.set(entry.with_job(job.clone()));
        Ok(true)
    }

    /// Release bookkeeping for an executor that has already exited.
    ///
    /// `false` while the executor is still alive.
    #[instrument(level = "debug", skip(self, endpoint, job), fields(job = %job.job_identity, identifier = %endpoint.identifier))]
    pub async fn finish_task(&self, endpoint: &ExecutorEndpoint, job: &JobContext) -> Result<bool, JobError> {
        require_identifier(endpoint)?;
        let identity = job.job_identity;
        let Some(slot) = self.registry.existing_slot(identity) else {
            return Ok(true);
        };
        let finished = {
            let _gate = slot.lock().await;
            match slot
                .current()
                .filter(|e| e.endpoint.identifier == endpoint.identifier)
            {
                Some(entry) => {
                    let alive = entry.handle.is_alive().await;
                    if !alive {
                        slot.clear();
                    }
                    !alive
                }
                None => true,
            }
        };
        drop(slot);
        if finished {
            self.registry.prune(identity);
        }
        Ok(finished)
    }

    /// Liveness of `endpoint` as the executor of `job`. Unknown is dead.
    pub async fn is_task_alive(&self, endpoint: &ExecutorEndpoint, job: &JobContext) -> bool {
        match self
            .registry
            .get_matching(job.job_identity, &endpoint.identifier)
        {
            Some(entry) => entry.handle.is_alive().await,
            None => false,
        }
    }

    /// Liveness by executor identifier alone.
    pub async fn is_alive_by_identifier(&self, identifier: &str) -> bool {
        match self.registry.find_by_identifier(identifier) {
            Some(entry) => entry.handle.is_alive().await,
            None => false,
        }
    }

    /// Poll until the executor is gone or `timeout` elapses; `true` if it stopped.
    pub async fn await_stopped(
        &self,
        endpoint: &ExecutorEndpoint,
        job: &JobContext,
        timeout: Duration,
        interval: Duration,
    ) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if !self.is_task_alive(endpoint, job).await {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(interval).await;
        }
    }

    pub fn endpoint_info(&self) -> EndpointInfo {
        system::endpoint_info()
    }

    /// Endpoints of every registered executor.
    pub fn executors(&self) -> Vec<ExecutorEndpoint> {
        self.registry
            .list()
            .into_iter()
            .map(|e| e.endpoint.clone())
            .collect()
    }

    /// Destroy every registered executor. Returns how many were destroyed.
    pub async fn destroy_all(&self) -> usize {
        let entries = self.registry.list();
        let mut destroyed = 0;
        for entry in entries {
            match self.destroy_task(&entry.endpoint, &entry.job).await {
                Ok(true) => destroyed += 1,
                Ok(false) => {}
                Err(e) => warn!(identifier = %entry.endpoint.identifier, error = %e, "destroy during shutdown failed"),
            }
        }
        destroyed
    }

    /// Executor registered for `job`, if any.
    pub fn registered(&self, job: JobIdentity) -> Option<ExecutorEndpoint> {
        self.registry.get(job).map(|e| e.endpoint.clone())
    }
}

fn require_identifier(endpoint: &ExecutorEndpoint) -> Result<(), JobError> {
    if endpoint.identifier.trim().is_empty() {
        return Err(JobError::InvalidArgument("executor endpoint identifier is empty".into()));
    }
    Ok(())
}

async fn poll_until_stopped(handle: &dyn ExecutorHandle, grace: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        if !handle.is_alive().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}

/// Host reported for local workers when the supervisor is bound to a wildcard.
fn launch_host(endpoint: &SupervisorEndpoint) -> String {
    match endpoint.host.as_str() {
        _ if endpoint.is_self() => system::advertise_host(),
        "" | "0.0.0.0" | "::" | "[::]" => system::advertise_host(),
        host => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    };

    use async_trait::async_trait;
    use vigil_model::ExecutorKind;

    use super::*;
    use crate::launcher::{ExecutorAddress, Launcher};

    #[derive(Default)]
    struct Counters {
        launches: AtomicUsize,
        stops: AtomicUsize,
        kills: AtomicUsize,
        workers: Mutex<Vec<Arc<AtomicBool>>>,
    }

    impl Counters {
        fn crash_all(&self) {
            for w in self.workers.lock().unwrap().iter() {
                w.store(false, Ordering::SeqCst);
            }
        }
    }

    struct FakeLauncher {
        counts: Arc<Counters>,
        ready: bool,
        /// Ignores graceful stop requests.
        stubborn: bool,
    }

    struct FakeHandle {
        counts: Arc<Counters>,
        alive: Arc<AtomicBool>,
        ready: bool,
        stubborn: bool,
    }

    #[async_trait]
    impl ExecutorHandle for FakeHandle {
        async fn wait_ready(&self, policy: &ReadyPolicy) -> Result<ExecutorAddress, JobError> {
            if self.ready {
                Ok(ExecutorAddress {
                    host: "127.0.0.1".into(),
                    port: 7000,
                })
            } else {
                Err(JobError::NotReady {
                    waited_ms: policy.timeout.as_millis() as u64,
                    reason: "never came up".into(),
                })
            }
        }

        async fn is_alive(&self) -> bool {
            self.alive.load(Ordering::SeqCst)
        }

        async fn request_stop(&self) -> Result<(), JobError> {
            self.counts.stops.fetch_add(1, Ordering::SeqCst);
            if !self.stubborn {
                self.alive.store(false, Ordering::SeqCst);
            }
            Ok(())
        }

        async fn kill(&self) -> Result<(), JobError> {
            self.counts.kills.fetch_add(1, Ordering::SeqCst);
            self.alive.store(false, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl Launcher for FakeLauncher {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn supports(&self, config: &ProcessConfig) -> bool {
            config.kind == ExecutorKind::Fn
        }

        async fn launch(&self, _request: &LaunchRequest<'_>) -> Result<Box<dyn ExecutorHandle>, JobError> {
            self.counts.launches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            let alive = Arc::new(AtomicBool::new(true));
            self.counts.workers.lock().unwrap().push(Arc::clone(&alive));
            Ok(Box::new(FakeHandle {
                counts: Arc::clone(&self.counts),
                alive,
                ready: self.ready,
                stubborn: self.stubborn,
            }))
        }
    }

    fn supervisor(ready: bool, stubborn: bool) -> (Arc<TaskSupervisor>, Arc<Counters>) {
        let counts = Arc::new(Counters::default());
        let router = LauncherRouter::new().with(Arc::new(FakeLauncher {
            counts: Arc::clone(&counts),
            ready,
            stubborn,
        }));
        let sup = TaskSupervisor::new(SupervisorEndpoint::new("127.0.0.1", 9000), router).with_config(
            SupervisorConfig {
                ready_timeout: Duration::from_millis(100),
                ready_poll_interval: Duration::from_millis(5),
                stop_grace: Duration::from_millis(50),
            },
        );
        (Arc::new(sup), counts)
    }

    fn job(id: u64) -> JobContext {
        JobContext::new(JobIdentity::of(id), "archive")
    }

    #[tokio::test]
    async fn start_is_idempotent_per_job() {
        let (sup, counts) = supervisor(true, false);
        let cfg = ProcessConfig::in_process();

        let first = sup.start_task(&job(1), &cfg).await.unwrap();
        let second = sup.start_task(&job(1), &cfg).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.identifier, "fn-1");
        assert_eq!(first.supervisor_port, 9000);
        assert_eq!(first.executor_port, 7000);
        assert_eq!(counts.launches.load(Ordering::SeqCst), 1);
        assert!(sup.is_task_alive(&first, &job(1)).await);
        assert!(sup.is_alive_by_identifier("fn-1").await);
    }

    #[tokio::test]
    async fn concurrent_starts_launch_once() {
        let (sup, counts) = supervisor(true, false);
        let cfg = ProcessConfig::in_process();

        let (j1, j2) = (job(3), job(3));
        let (a, b) = tokio::join!(sup.start_task(&j1, &cfg), sup.start_task(&j2, &cfg));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(counts.launches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_jobs_get_distinct_workers() {
        let (sup, counts) = supervisor(true, false);
        let cfg = ProcessConfig::in_process();

        let (j1, j2) = (job(1), job(2));
        let (a, b) = tokio::join!(sup.start_task(&j1, &cfg), sup.start_task(&j2, &cfg));
        assert_ne!(a.unwrap().identifier, b.unwrap().identifier);
        assert_eq!(counts.launches.load(Ordering::SeqCst), 2);
        assert_eq!(sup.executors().len(), 2);
    }

    #[tokio::test]
    async fn dead_executor_is_relaunched() {
        let (sup, counts) = supervisor(true, false);
        let cfg = ProcessConfig::in_process();

        sup.start_task(&job(1), &cfg).await.unwrap();
        counts.crash_all();
        sup.start_task(&job(1), &cfg).await.unwrap();
        assert_eq!(counts.launches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn readiness_failure_kills_and_leaves_nothing() {
        let (sup, counts) = supervisor(false, false);

        let err = sup
            .start_task(&job(1), &ProcessConfig::in_process())
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::NotReady { .. }));
        assert_eq!(counts.kills.load(Ordering::SeqCst), 1);
        assert!(sup.registered(JobIdentity::of(1)).is_none());
        assert!(sup.registry().existing_slot(JobIdentity::of(1)).is_none());
    }

    #[tokio::test]
    async fn unsupported_kind_fails_without_launching() {
        let (sup, counts) = supervisor(true, false);
        let err = sup
            .start_task(&job(1), &ProcessConfig::pod("busybox"))
            .await
            .unwrap_err();
        assert_eq!(err, JobError::NoLauncher("pod".into()));
        assert_eq!(counts.launches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn destroy_stops_gracefully_and_unregisters() {
        let (sup, counts) = supervisor(true, false);
        let ep = sup
            .start_task(&job(1), &ProcessConfig::in_process())
            .await
            .unwrap();

        assert!(sup.destroy_task(&ep, &job(1)).await.unwrap());
        assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
        assert_eq!(counts.kills.load(Ordering::SeqCst), 0);
        assert!(!sup.is_task_alive(&ep, &job(1)).await);
        assert!(sup.executors().is_empty());
    }

    #[tokio::test]
    async fn destroy_kills_after_grace() {
        let (sup, counts) = supervisor(true, true);
        let ep = sup
            .start_task(&job(1), &ProcessConfig::in_process())
            .await
            .unwrap();

        assert!(sup.destroy_task(&ep, &job(1)).await.unwrap());
        assert_eq!(counts.kills.load(Ordering::SeqCst), 1);
        assert!(sup.await_stopped(&ep, &job(1), Duration::from_millis(50), Duration::from_millis(5)).await);
    }

    #[tokio::test]
    async fn destroy_of_unknown_is_noop() {
        let (sup, _) = supervisor(true, false);
        let ep = ExecutorEndpoint {
            identifier: "fn-42".into(),
            host: "127.0.0.1".into(),
            supervisor_port: 9000,
            executor_port: 0,
        };
        assert!(sup.destroy_task(&ep, &job(42)).await.unwrap());
    }

    #[tokio::test]
    async fn destroy_with_foreign_identifier_leaves_executor_running() {
        let (sup, counts) = supervisor(true, false);
        let ep = sup
            .start_task(&job(7), &ProcessConfig::in_process())
            .await
            .unwrap();
        let stale = ExecutorEndpoint {
            identifier: "process-7".into(),
            ..ep.clone()
        };

        let err = sup.destroy_task(&stale, &job(7)).await.unwrap_err();
        assert!(matches!(err, JobError::NotFound(_)), "{err:?}");
        assert_eq!(counts.stops.load(Ordering::SeqCst), 0);
        assert!(sup.is_task_alive(&ep, &job(7)).await);
        assert_eq!(sup.registered(JobIdentity::of(7)), Some(ep));
    }

    #[tokio::test]
    async fn empty_identifier_is_rejected() {
        let (sup, _) = supervisor(true, false);
        let ep = ExecutorEndpoint {
            identifier: " ".into(),
            host: "127.0.0.1".into(),
            supervisor_port: 9000,
            executor_port: 0,
        };
        let err = sup.destroy_task(&ep, &job(1)).await.unwrap_err();
        assert!(matches!(err, JobError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn request_stop_keeps_registration() {
        let (sup, counts) = supervisor(true, false);
        let ep = sup
            .start_task(&job(1), &ProcessConfig::in_process())
            .await
            .unwrap();

        assert!(sup.request_stop(&ep, &job(1)).await.unwrap());
        assert_eq!(counts.stops.load(Ordering::SeqCst), 1);
        assert!(sup.registered(JobIdentity::of(1)).is_some());
        assert!(!sup.is_task_alive(&ep, &job(1)).await);
    }

    #[tokio::test]
    async fn modify_replaces_job_of_live_executor() {
        let (sup, counts) = supervisor(true, false);
        let ep = sup
            .start_task(&job(1), &ProcessConfig::in_process())
            .await
            .unwrap();

        let updated = job(1).with_parameter("rate", "500");
        assert!(sup.modify_task(&ep, &updated).await.unwrap());
        let entry = sup.registry().get(JobIdentity::of(1)).unwrap();
        assert_eq!(entry.job, updated);

        counts.crash_all();
        assert!(!sup.modify_task(&ep, &updated).await.unwrap());
        assert!(!sup.modify_task(&ep, &job(2)).await.unwrap());
    }

    #[tokio::test]
    async fn finish_requires_a_dead_executor() {
        let (sup, counts) = supervisor(true, false);
        let ep = sup
            .start_task(&job(1), &ProcessConfig::in_process())
            .await
            .unwrap();

        assert!(!sup.finish_task(&ep, &job(1)).await.unwrap());
        counts.crash_all();
        assert!(sup.finish_task(&ep, &job(1)).await.unwrap());
        assert!(sup.registered(JobIdentity::of(1)).is_none());
        assert!(sup.finish_task(&ep, &job(1)).await.unwrap());
    }

    #[tokio::test]
    async fn destroy_all_empties_registry() {
        let (sup, _) = supervisor(true, false);
        let cfg = ProcessConfig::in_process();
        for id in 1..=3 {
            sup.start_task(&job(id), &cfg).await.unwrap();
        }
        assert_eq!(sup.destroy_all().await, 3);
        assert!(sup.executors().is_empty());
    }

    #[test]
    fn wildcard_bind_is_not_advertised() {
        assert_eq!(launch_host(&SupervisorEndpoint::new("10.1.2.3", 1)), "10.1.2.3");
        assert_ne!(launch_host(&SupervisorEndpoint::new("0.0.0.0", 1)), "0.0.0.0");
        assert_ne!(launch_host(&SupervisorEndpoint::self_endpoint()), "__self__");
    }
}
