use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use tracing::{debug, warn};
use vigil_core::{ExecutorAddress, ExecutorHandle, JobError, LaunchRequest, Launcher, ReadyPolicy};
use vigil_model::{ExecutorKind, JobIdentity, Port, ProcessConfig, ResourceContext, ResourceState};

use crate::{PodResourceClient, api::PodApi};

const MAX_NAME_LEN: usize = 63;

/// Where and how executor pods are created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodConfig {
    pub namespace: String,
    /// Port the executor listens on inside its pod.
    pub executor_port: Port,
    pub image_pull_policy: String,
    /// Pod name is `{name_prefix}-{job identity}`.
    pub name_prefix: String,
}

impl Default for PodConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            executor_port: 8989,
            image_pull_policy: "IfNotPresent".to_string(),
            name_prefix: "vigil-job".to_string(),
        }
    }
}

impl PodConfig {
    /// DNS-label-safe pod name for `job`.
    pub fn pod_name(&self, job: JobIdentity) -> String {
        let raw = format!("{}-{job}", self.name_prefix);
        let mut name: String = raw
            .chars()
            .map(|c| match c.to_ascii_lowercase() {
                c @ ('a'..='z' | '0'..='9' | '-') => c,
                _ => '-',
            })
            .collect();
        name.truncate(MAX_NAME_LEN);
        name.trim_matches('-').to_string()
    }
}

/// Launcher for [`ExecutorKind::Pod`]: one pod per job.
pub struct PodLauncher {
    client: PodResourceClient,
    config: PodConfig,
}

impl PodLauncher {
    pub fn new(api: Arc<dyn PodApi>, config: PodConfig) -> Self {
        Self {
            client: PodResourceClient::new(api, config.executor_port),
            config,
        }
    }

    pub fn client(&self) -> &PodResourceClient {
        &self.client
    }

    fn resource_context(&self, request: &LaunchRequest<'_>) -> Result<ResourceContext, JobError> {
        let config = request.config;
        let image = config
            .image
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .ok_or_else(|| JobError::InvalidArgument("pod executor requires an image".into()))?;

        let command = if config.command.trim().is_empty() {
            Vec::new()
        } else {
            std::iter::once(config.command.clone())
                .chain(config.args.iter().cloned())
                .collect()
        };

        Ok(ResourceContext {
            namespace: self.config.namespace.clone(),
            name: self.config.pod_name(request.job.job_identity),
            image: image.to_string(),
            command,
            environments: request.environment(),
            image_pull_policy: Some(
                config
                    .image_pull_policy
                    .clone()
                    .unwrap_or_else(|| self.config.image_pull_policy.clone()),
            ),
        })
    }
}

#[async_trait]
impl Launcher for PodLauncher {
    fn name(&self) -> &'static str {
        "pod"
    }

    fn supports(&self, config: &ProcessConfig) -> bool {
        config.kind == ExecutorKind::Pod
    }

    async fn launch(&self, request: &LaunchRequest<'_>) -> Result<Box<dyn ExecutorHandle>, JobError> {
        let ctx = self.resource_context(request)?;
        let pod = self.client.create(&ctx).await?;
        debug!(pod = %pod.name, state = ?pod.state, "pod submitted");

        Ok(Box::new(PodHandle {
            client: self.client.clone(),
            namespace: pod.namespace,
            name: pod.name,
            port: request.config.executor_port.unwrap_or(self.config.executor_port),
        }))
    }
}

struct PodHandle {
    client: PodResourceClient,
    namespace: String,
    name: String,
    port: Port,
}

impl PodHandle {
    async fn delete(&self) -> Result<(), JobError> {
        match self.client.delete(&self.namespace, &self.name).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ExecutorHandle for PodHandle {
    async fn wait_ready(&self, policy: &ReadyPolicy) -> Result<ExecutorAddress, JobError> {
        let started = Instant::now();
        let mut last = String::from("not observed yet");
        loop {
            match self.client.get(&self.namespace, &self.name).await {
                Ok(Some(pod)) => match (pod.state, pod.pod_ip) {
                    (ResourceState::Available, Some(ip)) => {
                        return Ok(ExecutorAddress {
                            host: ip,
                            port: self.port,
                        });
                    }
                    (ResourceState::Destroying, _) => {
                        return Err(JobError::LaunchFailed(format!("pod {} is terminating", self.name)));
                    }
                    (state, _) => last = format!("state {state:?}"),
                },
                Ok(None) => last = "pod not found".to_string(),
                Err(e) => {
                    warn!(pod = %self.name, error = %e, "pod lookup failed; retrying");
                    last = e.to_string();
                }
            }
            if started.elapsed() >= policy.timeout {
                return Err(JobError::NotReady {
                    waited_ms: started.elapsed().as_millis() as u64,
                    reason: last,
                });
            }
            tokio::time::sleep(policy.poll_interval).await;
        }
    }

    async fn is_alive(&self) -> bool {
        match self.client.get(&self.namespace, &self.name).await {
            Ok(Some(pod)) => pod.state.is_live(),
            Ok(None) => false,
            Err(e) => {
                debug!(pod = %self.name, error = %e, "liveness lookup failed");
                false
            }
        }
    }

    async fn request_stop(&self) -> Result<(), JobError> {
        self.delete().await
    }

    async fn kill(&self) -> Result<(), JobError> {
        self.delete().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vigil_model::JobContext;

    use super::*;
    use crate::api::MemoryPodApi;

    const QUICK: ReadyPolicy = ReadyPolicy {
        timeout: Duration::from_millis(100),
        poll_interval: Duration::from_millis(10),
    };

    async fn launch(
        api: Arc<MemoryPodApi>,
        config: &ProcessConfig,
    ) -> Result<Box<dyn ExecutorHandle>, JobError> {
        let launcher = PodLauncher::new(api, PodConfig::default());
        let job = JobContext::new(JobIdentity::of(12), "archive");
        let request = LaunchRequest {
            identifier: "pod-12",
            job: &job,
            config,
            host: "supervisor.local",
        };
        launcher.launch(&request).await
    }

    #[test]
    fn pod_names_are_dns_labels() {
        let config = PodConfig {
            name_prefix: "Vigil_Job".into(),
            ..PodConfig::default()
        };
        assert_eq!(config.pod_name(JobIdentity::of(5)), "vigil-job-5");
        assert_eq!(PodConfig::default().pod_name(JobIdentity::of(1)), "vigil-job-1");

        let long = PodConfig {
            name_prefix: "x".repeat(80),
            ..PodConfig::default()
        };
        assert!(long.pod_name(JobIdentity::of(1)).len() <= MAX_NAME_LEN);
    }

    #[tokio::test]
    async fn running_pod_is_ready_at_its_ip() {
        let api = Arc::new(MemoryPodApi::auto_start());
        let handle = launch(api.clone(), &ProcessConfig::pod("worker:1")).await.unwrap();

        let addr = handle.wait_ready(&QUICK).await.unwrap();
        assert!(addr.host.starts_with("10.0."));
        assert_eq!(addr.port, 8989);
        assert!(handle.is_alive().await);

        handle.request_stop().await.unwrap();
        assert!(!handle.is_alive().await);
        assert!(api.is_empty());
        handle.kill().await.unwrap();
    }

    #[tokio::test]
    async fn pending_pod_times_out() {
        let api = Arc::new(MemoryPodApi::new());
        let handle = launch(api.clone(), &ProcessConfig::pod("worker:1")).await.unwrap();

        assert!(handle.is_alive().await);
        let err = handle.wait_ready(&QUICK).await.unwrap_err();
        assert!(matches!(err, JobError::NotReady { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn pod_becomes_ready_once_running() {
        let api = Arc::new(MemoryPodApi::new());
        let config = ProcessConfig::pod("worker:1").with_executor_port(9100);
        let handle = launch(api.clone(), &config).await.unwrap();

        let flip = {
            let api = api.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                api.set_phase("default", "vigil-job-12", "Running", Some("10.9.9.9"));
            })
        };
        let policy = ReadyPolicy {
            timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(10),
        };
        let addr = handle.wait_ready(&policy).await.unwrap();
        flip.await.unwrap();
        assert_eq!(addr, ExecutorAddress { host: "10.9.9.9".into(), port: 9100 });
    }

    #[tokio::test]
    async fn relaunch_reuses_the_existing_pod() {
        let api = Arc::new(MemoryPodApi::auto_start());
        launch(api.clone(), &ProcessConfig::pod("worker:1")).await.unwrap();
        launch(api.clone(), &ProcessConfig::pod("worker:1")).await.unwrap();
        assert_eq!(api.create_calls(), 2);
        assert_eq!(api.len(), 1);
    }

    #[tokio::test]
    async fn image_is_required() {
        let api = Arc::new(MemoryPodApi::new());
        let mut config = ProcessConfig::pod(" ");
        config.image = Some(" ".into());
        let err = launch(api, &config).await.err().unwrap();
        assert!(matches!(err, JobError::InvalidArgument(_)));
    }
}
