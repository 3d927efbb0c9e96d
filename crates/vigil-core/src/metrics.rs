//! Metrics seam.
//!
//! The core only records; exporting is up to whichever backend is plugged in
//! (see the `vigil-prometheus` crate).

use std::{sync::Arc, time::Duration};

use vigil_model::CommandType;

/// Where a proxied call was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Local,
    Remote,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Local => "local",
            Route::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchOutcome {
    Started,
    /// An already running executor for the same job was returned.
    Reused,
    Failed,
}

impl LaunchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchOutcome::Started => "started",
            LaunchOutcome::Reused => "reused",
            LaunchOutcome::Failed => "failed",
        }
    }
}

pub trait MetricsBackend: Send + Sync + 'static {
    fn record_command(&self, command: CommandType, route: Route);

    fn record_launch(&self, launcher: &str, outcome: LaunchOutcome, elapsed: Duration);

    fn record_transport_error(&self, kind: &str);
}

pub type MetricsHandle = Arc<dyn MetricsBackend>;

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl NoopMetrics {
    pub fn handle() -> MetricsHandle {
        Arc::new(NoopMetrics)
    }
}

impl MetricsBackend for NoopMetrics {
    fn record_command(&self, _command: CommandType, _route: Route) {}

    fn record_launch(&self, _launcher: &str, _outcome: LaunchOutcome, _elapsed: Duration) {}

    fn record_transport_error(&self, _kind: &str) {}
}
