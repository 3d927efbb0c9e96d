use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use vigil_model::{PodResource, Port, ResourceContext};

use crate::{
    OrchestratorError,
    api::PodApi,
    manifest::Pod,
    phase::map_phase,
};

/// Substrate-neutral create / get / delete of pod resources.
#[derive(Clone)]
pub struct PodResourceClient {
    api: Arc<dyn PodApi>,
    service_port: Port,
}

impl PodResourceClient {
    /// `service_port` is the port executors inside the pods listen on.
    pub fn new(api: Arc<dyn PodApi>, service_port: Port) -> Self {
        Self { api, service_port }
    }

    pub fn service_port(&self) -> Port {
        self.service_port
    }

    /// Create the pod described by `ctx`.
    ///
    /// Safe to repeat: when the orchestrator reports the name as taken, the
    /// existing pod is returned instead of the error.
    #[instrument(level = "info", skip(self, ctx), fields(namespace = %ctx.namespace, name = %ctx.name))]
    pub async fn create(&self, ctx: &ResourceContext) -> Result<PodResource, OrchestratorError> {
        let manifest = Pod::from_context(ctx);
        match self.api.create_pod(&ctx.namespace, &manifest).await {
            Ok(created) => {
                info!("pod created");
                Ok(self.to_resource(&ctx.namespace, &created))
            }
            Err(err) if err.is_already_exists() => {
                debug!("pod already exists; reusing");
                match self.get(&ctx.namespace, &ctx.name).await? {
                    Some(existing) => Ok(existing),
                    None => {
                        warn!("pod reported as existing but not found");
                        Err(err)
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Pod named exactly `name`; absence is `Ok(None)`.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, namespace: &str, name: &str) -> Result<Option<PodResource>, OrchestratorError> {
        let pods = self.api.list_pods_by_name(namespace, name).await?;
        Ok(pods
            .iter()
            .find(|p| p.metadata.name == name)
            .map(|p| self.to_resource(namespace, p)))
    }

    /// Request deletion and return the deleted name. Does not wait.
    #[instrument(level = "info", skip(self))]
    pub async fn delete(&self, namespace: &str, name: &str) -> Result<String, OrchestratorError> {
        let pod = self.api.delete_pod(namespace, name).await?;
        let deleted = if pod.metadata.name.is_empty() {
            name.to_string()
        } else {
            pod.metadata.name
        };
        info!(pod = %deleted, "pod deletion requested");
        Ok(deleted)
    }

    fn to_resource(&self, namespace: &str, pod: &Pod) -> PodResource {
        PodResource {
            namespace: namespace.to_string(),
            name: pod.metadata.name.clone(),
            state: map_phase(pod.effective_phase()),
            pod_ip: pod.pod_ip().map(str::to_string),
            service_port: self.service_port,
            create_time: pod.created_at(),
        }
    }
}
