use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::PodApi;
use crate::{
    OrchestratorError,
    manifest::{Pod, PodList},
};

/// Where the orchestrator API lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeApiConfig {
    /// e.g. `https://10.0.0.1:6443`.
    pub base_url: String,
    pub bearer_token: Option<String>,
    /// Applies to connect and to the whole request.
    pub timeout: Duration,
}

impl KubeApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// core/v1 pods over plain REST.
pub struct KubeRestApi {
    http: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl KubeRestApi {
    pub fn new(config: KubeApiConfig) -> Result<Self, OrchestratorError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(OrchestratorError::NotConfigured("base url is empty".into()));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            bearer_token: config.bearer_token,
        })
    }

    fn pods_url(&self, namespace: &str) -> String {
        format!("{}/api/v1/namespaces/{namespace}/pods", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, OrchestratorError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(OrchestratorError::Status {
            code: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body)
        .map_err(|e| OrchestratorError::Decode(format!("{e}, body: {body}")))
}

#[async_trait]
impl PodApi for KubeRestApi {
    #[instrument(level = "debug", skip(self, pod), fields(pod = %pod.metadata.name))]
    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<Pod, OrchestratorError> {
        let response = self
            .authorize(self.http.post(self.pods_url(namespace)))
            .json(pod)
            .send()
            .await?;
        read(response).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_pods_by_name(&self, namespace: &str, name: &str) -> Result<Vec<Pod>, OrchestratorError> {
        // Pod names are DNS labels; only the selector's `=` needs escaping.
        let url = format!("{}?fieldSelector=metadata.name%3D{name}", self.pods_url(namespace));
        let response = self.authorize(self.http.get(url)).send().await?;
        let list: PodList = read(response).await?;
        debug!(found = list.items.len(), "pods listed");
        Ok(list.items)
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<Pod, OrchestratorError> {
        let url = format!("{}/{name}", self.pods_url(namespace));
        let response = self.authorize(self.http.delete(url)).send().await?;
        read(response).await
    }
}
