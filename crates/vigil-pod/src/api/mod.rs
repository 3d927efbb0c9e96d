use async_trait::async_trait;

use crate::{OrchestratorError, manifest::Pod};

mod kube;
pub use kube::{KubeApiConfig, KubeRestApi};

mod memory;
pub use memory::MemoryPodApi;

/// Raw namespaced pod operations of an orchestrator.
#[async_trait]
pub trait PodApi: Send + Sync {
    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, OrchestratorError>;

    /// Pods whose name equals `name` exactly.
    async fn list_pods_by_name(&self, namespace: &str, name: &str) -> Result<Vec<Pod>, OrchestratorError>;

    /// Ask for deletion; returns the pod as last seen by the orchestrator.
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<Pod, OrchestratorError>;
}
