use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use vigil_core::{ExecutorAddress, ExecutorHandle, JobError, LaunchRequest, Launcher, ReadyPolicy};
use vigil_model::{ExecutorKind, JobContext, Port, ProcessConfig};

use crate::error::ExecError;

/// What a registered function receives.
#[derive(Debug, Clone)]
pub struct FnContext {
    pub identifier: String,
    pub job: JobContext,
    /// Cancelled on a graceful stop request.
    pub cancel: CancellationToken,
}

pub type FnFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;
pub type JobFn = Arc<dyn Fn(FnContext) -> FnFuture + Send + Sync>;

/// Launcher for pre-registered functions ([`ExecutorKind::Fn`]).
///
/// Functions are looked up by the job's class name and run as tokio tasks.
pub struct FnLauncher {
    name: &'static str,
    registry: Arc<RwLock<HashMap<String, JobFn>>>,
}

impl FnLauncher {
    pub fn new() -> Self {
        Self::with_name("fn")
    }

    pub fn with_name(name: &'static str) -> Self {
        Self {
            name,
            registry: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register `f` for jobs of `job_class`; a previous registration is replaced.
    pub fn register<F, Fut>(&self, job_class: impl Into<String>, f: F) -> &Self
    where
        F: Fn(FnContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let job_class = job_class.into();
        let job_fn: JobFn = Arc::new(move |ctx: FnContext| -> FnFuture { Box::pin(f(ctx)) });
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_class.clone(), job_fn);
        trace!(job_class, "function registered");
        self
    }

    pub fn unregister(&self, job_class: &str) -> bool {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(job_class)
            .is_some()
    }

    pub fn is_registered(&self, job_class: &str) -> bool {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(job_class)
    }

    pub fn count(&self) -> usize {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn resolve(&self, job_class: &str) -> Result<JobFn, ExecError> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(job_class)
            .cloned()
            .ok_or_else(|| ExecError::FunctionNotFound(job_class.to_string()))
    }
}

impl Default for FnLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Launcher for FnLauncher {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, config: &ProcessConfig) -> bool {
        config.kind == ExecutorKind::Fn
    }

    async fn launch(&self, request: &LaunchRequest<'_>) -> Result<Box<dyn ExecutorHandle>, JobError> {
        if request.config.kind != ExecutorKind::Fn {
            return Err(ExecError::UnsupportedKind.into());
        }
        let job_fn = self.resolve(&request.job.job_class)?;
        debug!(job_class = %request.job.job_class, "function resolved from registry");

        let cancel = CancellationToken::new();
        let ctx = FnContext {
            identifier: request.identifier.to_string(),
            job: request.job.clone(),
            cancel: cancel.clone(),
        };
        let identifier = ctx.identifier.clone();
        let task = tokio::spawn(async move {
            match job_fn(ctx).await {
                Ok(()) => debug!(target: "vigil.exec.fn", executor = %identifier, "function finished"),
                Err(reason) => warn!(target: "vigil.exec.fn", executor = %identifier, %reason, "function failed"),
            }
        });

        Ok(Box::new(FnHandle {
            host: request.host.to_string(),
            port: request.config.executor_port.unwrap_or(0),
            cancel,
            task,
        }))
    }
}

struct FnHandle {
    host: String,
    port: Port,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

#[async_trait]
impl ExecutorHandle for FnHandle {
    async fn wait_ready(&self, _policy: &ReadyPolicy) -> Result<ExecutorAddress, JobError> {
        Ok(ExecutorAddress {
            host: self.host.clone(),
            port: self.port,
        })
    }

    async fn is_alive(&self) -> bool {
        !self.task.is_finished()
    }

    async fn request_stop(&self) -> Result<(), JobError> {
        self.cancel.cancel();
        Ok(())
    }

    async fn kill(&self) -> Result<(), JobError> {
        self.cancel.cancel();
        self.task.abort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use vigil_model::JobIdentity;

    use super::*;

    async fn launch(launcher: &FnLauncher, class: &str) -> Result<Box<dyn ExecutorHandle>, JobError> {
        let job = JobContext::new(JobIdentity::of(9), class);
        let config = ProcessConfig::in_process();
        let request = LaunchRequest {
            identifier: "fn-9",
            job: &job,
            config: &config,
            host: "127.0.0.1",
        };
        launcher.launch(&request).await
    }

    async fn eventually_dead(handle: &dyn ExecutorHandle) -> bool {
        for _ in 0..100 {
            if !handle.is_alive().await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn cooperative_function_stops_on_cancel() {
        let launcher = FnLauncher::new();
        launcher.register("archive", |ctx: FnContext| async move {
            ctx.cancel.cancelled().await;
            Ok(())
        });

        let handle = launch(&launcher, "archive").await.unwrap();
        handle.wait_ready(&ReadyPolicy::default()).await.unwrap();
        assert!(handle.is_alive().await);

        handle.request_stop().await.unwrap();
        assert!(eventually_dead(handle.as_ref()).await);
    }

    #[tokio::test]
    async fn stubborn_function_is_aborted() {
        let launcher = FnLauncher::new();
        launcher.register("stubborn", |_ctx: FnContext| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        });

        let handle = launch(&launcher, "stubborn").await.unwrap();
        handle.request_stop().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(handle.is_alive().await);

        handle.kill().await.unwrap();
        assert!(eventually_dead(handle.as_ref()).await);
    }

    #[tokio::test]
    async fn job_context_is_handed_over() {
        let launcher = FnLauncher::new();
        let (tx, rx) = tokio::sync::oneshot::channel();
        let tx = std::sync::Mutex::new(Some(tx));
        launcher.register("echo", move |ctx: FnContext| {
            let sent = tx.lock().unwrap().take().map(|tx| tx.send((ctx.identifier, ctx.job.job_identity)));
            async move {
                assert!(sent.is_some());
                Ok(())
            }
        });

        let _handle = launch(&launcher, "echo").await.unwrap();
        let (identifier, identity) = rx.await.unwrap();
        assert_eq!(identifier, "fn-9");
        assert_eq!(identity, JobIdentity::of(9));
    }

    #[tokio::test]
    async fn unknown_class_fails_to_launch() {
        let launcher = FnLauncher::new();
        let err = launch(&launcher, "missing").await.err().unwrap();
        assert_eq!(
            err,
            JobError::LaunchFailed("no function registered for job class `missing`".into())
        );
    }

    #[test]
    fn register_replaces_and_unregister_removes() {
        let launcher = FnLauncher::with_name("custom-fn");
        launcher.register("a", |_ctx: FnContext| async { Ok(()) });
        launcher.register("a", |_ctx: FnContext| async { Err("second".to_string()) });
        assert_eq!(launcher.count(), 1);
        assert_eq!(launcher.name(), "custom-fn");

        assert!(launcher.unregister("a"));
        assert!(!launcher.is_registered("a"));
        assert!(!launcher.unregister("a"));
    }
}
