use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ExecutorKind, JobIdentity, Port};

const SELF_HOST: &str = "__self__";
const SELF_PORT: Port = 0;

/// Address of a node that hosts executors and accepts commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorEndpoint {
    pub host: String,
    pub port: Port,
}

impl SupervisorEndpoint {
    pub fn new(host: impl Into<String>, port: Port) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Sentinel meaning "the supervisor inside this very process".
    pub fn self_endpoint() -> Self {
        Self::new(SELF_HOST, SELF_PORT)
    }

    #[inline]
    pub fn is_self(&self) -> bool {
        self.host == SELF_HOST && self.port == SELF_PORT
    }

    /// Base URL of the node's command receiver.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for SupervisorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_self() {
            f.write_str("self")
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// A started worker.
///
/// Only a successful start produces one; callers never build these by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorEndpoint {
    /// Job-derived identifier, stable across repeated starts of the same job.
    pub identifier: String,
    pub host: String,
    /// Port of the supervisor that owns the worker.
    pub supervisor_port: Port,
    /// Port the worker itself listens on; `0` when it does not listen.
    #[serde(default)]
    pub executor_port: Port,
}

impl ExecutorEndpoint {
    /// Identifier for `job` launched on `kind`.
    pub fn identifier_for(kind: ExecutorKind, job: JobIdentity) -> String {
        format!("{kind}-{job}")
    }
}

impl fmt::Display for ExecutorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.identifier, self.host, self.executor_port)
    }
}

/// Capacity snapshot of a supervisor's host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointInfo {
    /// OS family, e.g. `linux`.
    pub os_name: String,
    /// Distribution name where the host reports one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub os_distribution: String,
    #[serde(default)]
    pub arch: String,
    pub total_memory_mb: u64,
    pub free_memory_mb: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_recognised_and_compared_by_value() {
        let sentinel = SupervisorEndpoint::self_endpoint();
        assert!(sentinel.is_self());
        assert_eq!(sentinel, SupervisorEndpoint::self_endpoint());
        assert!(!SupervisorEndpoint::new("10.0.0.5", 8989).is_self());
        assert_eq!(sentinel.to_string(), "self");
    }

    #[test]
    fn identifier_is_job_derived() {
        let id = ExecutorEndpoint::identifier_for(ExecutorKind::Pod, JobIdentity::of(1024));
        assert_eq!(id, "pod-1024");
    }

    #[test]
    fn executor_endpoint_wire_names() {
        let ep = ExecutorEndpoint {
            identifier: "process-1".into(),
            host: "127.0.0.1".into(),
            supervisor_port: 9000,
            executor_port: 9100,
        };
        let json = serde_json::to_value(&ep).unwrap();
        assert_eq!(json["supervisorPort"], 9000);
        assert_eq!(json["executorPort"], 9100);
    }
}
