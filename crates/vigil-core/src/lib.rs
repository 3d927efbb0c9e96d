mod error;
pub use error::JobError;

pub mod launcher;
pub use launcher::{ExecutorAddress, ExecutorHandle, LaunchRequest, Launcher, ReadyPolicy};

pub mod metrics;
pub use metrics::{LaunchOutcome, MetricsBackend, MetricsHandle, NoopMetrics, Route};

pub mod registry;
pub use registry::{ExecutorRegistry, RegisteredExecutor};

pub mod router;
pub use router::LauncherRouter;

pub mod supervisor;
pub use supervisor::{SupervisorConfig, TaskSupervisor};

mod system;
pub use system::{advertise_host, arch, endpoint_info, os_info, platform};
