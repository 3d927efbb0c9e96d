//! The slice of the core/v1 Pod object this crate reads and writes.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use vigil_model::ResourceContext;

pub const API_VERSION: &str = "v1";
pub const KIND_POD: &str = "Pod";
const RESTART_POLICY: &str = "Always";
/// Phase reported for a pod that has a deletion timestamp.
pub const TERMINATING_PHASE: &str = "Terminating";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<PodSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PodStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_pull_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, rename = "podIP", skip_serializing_if = "Option::is_none")]
    pub pod_ip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<Pod>,
}

impl Pod {
    /// Single-container pod described by `ctx`.
    pub fn from_context(ctx: &ResourceContext) -> Self {
        let env = ctx
            .environments
            .effective()
            .into_iter()
            .map(|(name, value)| EnvVar { name, value })
            .collect();

        Pod {
            api_version: API_VERSION.to_string(),
            kind: KIND_POD.to_string(),
            metadata: ObjectMeta {
                name: ctx.name.clone(),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: ctx.name.clone(),
                    image: ctx.image.clone(),
                    image_pull_policy: ctx.image_pull_policy.clone(),
                    command: ctx.command.clone(),
                    env,
                }],
                restart_policy: Some(RESTART_POLICY.to_string()),
            }),
            status: None,
        }
    }

    /// Phase as the orchestrator's own tooling would show it.
    pub fn effective_phase(&self) -> &str {
        if self.metadata.deletion_timestamp.is_some() {
            return TERMINATING_PHASE;
        }
        self.status
            .as_ref()
            .and_then(|s| s.phase.as_deref())
            .unwrap_or_default()
    }

    pub fn pod_ip(&self) -> Option<&str> {
        self.status
            .as_ref()
            .and_then(|s| s.pod_ip.as_deref())
            .filter(|ip| !ip.is_empty())
    }

    /// Creation time, or now when the orchestrator did not report a parsable one.
    pub fn created_at(&self) -> OffsetDateTime {
        self.metadata
            .creation_timestamp
            .as_deref()
            .and_then(|ts| OffsetDateTime::parse(ts, &Rfc3339).ok())
            .unwrap_or_else(OffsetDateTime::now_utc)
    }
}

/// RFC 3339 timestamp for `at`, as the orchestrator writes them.
pub fn timestamp(at: OffsetDateTime) -> Result<String, time::error::Format> {
    at.format(&Rfc3339)
}

#[cfg(test)]
mod tests {
    use vigil_model::ExecutorEnv;

    use super::*;

    fn context() -> ResourceContext {
        ResourceContext {
            namespace: "jobs".into(),
            name: "vigil-job-7".into(),
            image: "registry.local/worker:1.2".into(),
            command: vec!["/bin/worker".into(), "--serve".into()],
            environments: ExecutorEnv::new().with("A", "1").with("A", "2").with("B", "x"),
            image_pull_policy: Some("IfNotPresent".into()),
        }
    }

    #[test]
    fn manifest_wire_shape() {
        let json = serde_json::to_value(Pod::from_context(&context())).unwrap();

        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["kind"], "Pod");
        assert_eq!(json["metadata"]["name"], "vigil-job-7");
        assert_eq!(json["spec"]["restartPolicy"], "Always");

        let container = &json["spec"]["containers"][0];
        assert_eq!(container["image"], "registry.local/worker:1.2");
        assert_eq!(container["imagePullPolicy"], "IfNotPresent");
        assert_eq!(container["command"][1], "--serve");
        assert_eq!(container["env"].as_array().unwrap().len(), 2);
        assert_eq!(container["env"][0]["name"], "A");
        assert_eq!(container["env"][0]["value"], "2");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn reads_status_from_orchestrator_json() {
        let pod: Pod = serde_json::from_str(
            r#"{"metadata":{"name":"p","creationTimestamp":"2024-01-02T03:04:05Z"},
                "status":{"phase":"Running","podIP":"10.1.2.3"}}"#,
        )
        .unwrap();

        assert_eq!(pod.effective_phase(), "Running");
        assert_eq!(pod.pod_ip(), Some("10.1.2.3"));
        assert_eq!(pod.created_at().unix_timestamp(), 1_704_164_645);
    }

    #[test]
    fn deletion_timestamp_means_terminating() {
        let pod: Pod = serde_json::from_str(
            r#"{"metadata":{"name":"p","deletionTimestamp":"2024-01-02T03:04:05Z"},
                "status":{"phase":"Running","podIP":""}}"#,
        )
        .unwrap();
        assert_eq!(pod.effective_phase(), TERMINATING_PHASE);
        assert_eq!(pod.pod_ip(), None);
    }

    #[test]
    fn timestamp_parses_back_to_the_same_instant() {
        let at = OffsetDateTime::from_unix_timestamp(1_704_164_645).unwrap();
        let text = timestamp(at).unwrap();
        assert_eq!(text, "2024-01-02T03:04:05Z");
        assert_eq!(OffsetDateTime::parse(&text, &Rfc3339).unwrap(), at);

        let precise = OffsetDateTime::from_unix_timestamp_nanos(1_704_164_645_123_456_789).unwrap();
        let text = timestamp(precise).unwrap();
        assert_eq!(OffsetDateTime::parse(&text, &Rfc3339).unwrap(), precise);
    }

    #[test]
    fn unparsable_creation_time_falls_back_to_now() {
        let pod: Pod = serde_json::from_str(r#"{"metadata":{"name":"p","creationTimestamp":"yesterday"}}"#).unwrap();
        let before = OffsetDateTime::now_utc();
        assert!(pod.created_at() >= before);
    }
}
