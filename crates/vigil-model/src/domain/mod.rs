mod kv;
pub use kv::KeyValue;

mod env;
pub use env::ExecutorEnv;

mod job;
pub use job::{JobContext, JobIdentity};

mod process;
pub use process::{ExecutorKind, ProcessConfig, RlimitSpec};

mod endpoint;
pub use endpoint::{EndpointInfo, ExecutorEndpoint, SupervisorEndpoint};

mod resource;
pub use resource::{PodResource, ResourceContext, ResourceState};

/// Port value in the range accepted by TCP listeners.
pub type Port = u16;
