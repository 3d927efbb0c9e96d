use std::{
    collections::HashMap,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use time::OffsetDateTime;

use super::PodApi;
use crate::{
    OrchestratorError,
    manifest::{Pod, PodStatus, timestamp},
};

const PENDING: &str = "Pending";
const RUNNING: &str = "Running";

/// Orchestrator double keeping pods in memory.
///
/// Duplicate creates answer `409` like the real API. With
/// [`auto_start`](Self::auto_start) new pods come up `Running` with an address
/// right away; otherwise they stay `Pending` until [`set_phase`](Self::set_phase).
#[derive(Default)]
pub struct MemoryPodApi {
    pods: Mutex<HashMap<(String, String), Pod>>,
    creates: AtomicUsize,
    auto_start: bool,
}

impl MemoryPodApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_start() -> Self {
        Self {
            auto_start: true,
            ..Self::default()
        }
    }

    /// Number of create calls received, including rejected ones.
    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.pods.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move a stored pod to `phase`. Returns `false` if it does not exist.
    pub fn set_phase(&self, namespace: &str, name: &str, phase: &str, pod_ip: Option<&str>) -> bool {
        let mut pods = self.pods.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pod) = pods.get_mut(&(namespace.to_string(), name.to_string())) else {
            return false;
        };
        pod.status = Some(PodStatus {
            phase: Some(phase.to_string()),
            pod_ip: pod_ip.map(str::to_string),
        });
        true
    }
}

#[async_trait]
impl PodApi for MemoryPodApi {
    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, OrchestratorError> {
        let seq = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        let key = (namespace.to_string(), pod.metadata.name.clone());

        let mut pods = self.pods.lock().unwrap_or_else(PoisonError::into_inner);
        if pods.contains_key(&key) {
            return Err(OrchestratorError::Status {
                code: 409,
                body: format!(r#"pods "{}" already exists"#, pod.metadata.name),
            });
        }

        let mut stored = pod.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        stored.metadata.creation_timestamp = timestamp(OffsetDateTime::now_utc()).ok();
        stored.status = Some(if self.auto_start {
            PodStatus {
                phase: Some(RUNNING.to_string()),
                pod_ip: Some(format!("10.0.{}.{}", seq / 250, seq % 250 + 1)),
            }
        } else {
            PodStatus {
                phase: Some(PENDING.to_string()),
                pod_ip: None,
            }
        });
        pods.insert(key, stored.clone());
        Ok(stored)
    }

    async fn list_pods_by_name(&self, namespace: &str, name: &str) -> Result<Vec<Pod>, OrchestratorError> {
        let pods = self.pods.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(pods
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .into_iter()
            .collect())
    }

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<Pod, OrchestratorError> {
        let mut pods = self.pods.lock().unwrap_or_else(PoisonError::into_inner);
        let mut pod = pods
            .remove(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| OrchestratorError::Status {
                code: 404,
                body: format!(r#"pods "{name}" not found"#),
            })?;
        pod.metadata.deletion_timestamp = timestamp(OffsetDateTime::now_utc()).ok();
        Ok(pod)
    }
}
