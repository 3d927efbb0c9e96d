use std::sync::Arc;

use tracing::{instrument, trace};
use vigil_model::ProcessConfig;

use crate::{JobError, launcher::Launcher};

/// Ordered set of launchers; the first one that supports a config wins.
#[derive(Default, Clone)]
pub struct LauncherRouter {
    launchers: Vec<Arc<dyn Launcher>>,
}

impl LauncherRouter {
    #[inline]
    pub fn new() -> Self {
        Self {
            launchers: Vec::new(),
        }
    }

    #[inline]
    pub fn register(&mut self, launcher: Arc<dyn Launcher>) {
        self.launchers.push(launcher);
    }

    #[inline]
    pub fn with(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.register(launcher);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.launchers.iter().map(|l| l.name()).collect()
    }

    #[instrument(level = "trace", skip(self, config), fields(kind = %config.kind))]
    pub fn pick(&self, config: &ProcessConfig) -> Result<&Arc<dyn Launcher>, JobError> {
        let launcher = self
            .launchers
            .iter()
            .find(|l| l.supports(config))
            .ok_or_else(|| JobError::NoLauncher(config.kind.to_string()))?;

        trace!(launcher = launcher.name(), "launcher selected");
        Ok(launcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::{ExecutorHandle, LaunchRequest};
    use async_trait::async_trait;
    use vigil_model::ExecutorKind;

    struct KindOnly(&'static str, ExecutorKind);

    #[async_trait]
    impl Launcher for KindOnly {
        fn name(&self) -> &'static str {
            self.0
        }

        fn supports(&self, config: &ProcessConfig) -> bool {
            config.kind == self.1
        }

        async fn launch(
            &self,
            _request: &LaunchRequest<'_>,
        ) -> Result<Box<dyn ExecutorHandle>, JobError> {
            Err(JobError::LaunchFailed("not used".into()))
        }
    }

    #[test]
    fn first_supporting_launcher_wins() {
        let router = LauncherRouter::new()
            .with(Arc::new(KindOnly("proc-a", ExecutorKind::Process)))
            .with(Arc::new(KindOnly("proc-b", ExecutorKind::Process)))
            .with(Arc::new(KindOnly("fn", ExecutorKind::Fn)));

        let picked = router.pick(&ProcessConfig::process("true", [""; 0])).unwrap();
        assert_eq!(picked.name(), "proc-a");

        let picked = router.pick(&ProcessConfig::in_process()).unwrap();
        assert_eq!(picked.name(), "fn");
    }

    #[test]
    fn unsupported_kind_is_reported() {
        let router = LauncherRouter::new().with(Arc::new(KindOnly("fn", ExecutorKind::Fn)));
        let err = router.pick(&ProcessConfig::pod("busybox")).err().unwrap();
        assert_eq!(err, JobError::NoLauncher("pod".into()));
    }
}
