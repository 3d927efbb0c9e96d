use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{ExecutorEnv, Port};

/// Orchestrator-neutral lifecycle phase of a pod-like resource.
///
/// Intended order is `Creating -> Available -> Destroying -> (removed)`;
/// `Unknown` may be reported at any point and never blocks progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceState {
    Creating,
    Available,
    Destroying,
    Unknown,
}

impl ResourceState {
    /// Position in the intended lifecycle; `None` for `Unknown`.
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            ResourceState::Creating => Some(0),
            ResourceState::Available => Some(1),
            ResourceState::Destroying => Some(2),
            ResourceState::Unknown => None,
        }
    }

    /// Whether moving from `self` to `next` respects the lifecycle order.
    pub fn can_transition_to(&self, next: ResourceState) -> bool {
        match (self.ordinal(), next.ordinal()) {
            (Some(from), Some(to)) => to >= from,
            _ => true,
        }
    }

    /// The resource exists and has not been asked to go away.
    pub fn is_live(&self) -> bool {
        matches!(self, ResourceState::Creating | ResourceState::Available)
    }
}

/// Everything needed to ask the orchestrator for one pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContext {
    pub namespace: String,
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "ExecutorEnv::is_empty")]
    pub environments: ExecutorEnv,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
}

/// Snapshot of an orchestrator pod as seen by the resource client.
///
/// Replaced wholesale on every query; nothing mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodResource {
    pub namespace: String,
    pub name: String,
    pub state: ResourceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
    pub service_port: Port,
    #[serde(with = "time::serde::rfc3339")]
    pub create_time: OffsetDateTime,
}
