use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use tracing::{debug, instrument, warn};
use vigil_core::{MetricsHandle, NoopMetrics};
use vigil_model::{EndpointInfo, ProtocolError, SupervisorEndpoint, TaskCommand, encode_command};

use super::{CommandTransport, TransportConfig, WireProtocol};
use crate::{CommandReply, DispatchError, TransportError, decode_envelope_reply, decode_legacy_reply, paths};

/// [`CommandTransport`] over HTTP/JSON.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    protocol: WireProtocol,
    metrics: MetricsHandle,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        Ok(Self {
            http,
            protocol: config.protocol,
            metrics: NoopMetrics::handle(),
        })
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn protocol(&self) -> WireProtocol {
        self.protocol
    }

    fn failed(&self, target: &SupervisorEndpoint, err: reqwest::Error) -> DispatchError {
        let err = TransportError::from_reqwest(target, err);
        self.metrics.record_transport_error(err.kind());
        warn!(%target, error = %err, "command transport failed");
        err.into()
    }
}

#[async_trait]
impl CommandTransport for HttpTransport {
    #[instrument(level = "debug", skip(self, target, command), fields(%target, command = %command.command_type()))]
    async fn send(&self, target: &SupervisorEndpoint, command: &TaskCommand) -> Result<CommandReply, DispatchError> {
        let body = encode_command(command)?;
        let url = format!("{}{}", target.base_url(), self.protocol.command_path());

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| self.failed(target, e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| self.failed(target, e))?;
        debug!(status = status.as_u16(), "command answered");

        match self.protocol {
            WireProtocol::Legacy if status.is_success() => decode_legacy_reply(command.command_type(), &text),
            WireProtocol::Legacy => {
                let err = TransportError::Status {
                    target: target.to_string(),
                    code: status.as_u16(),
                    body: text,
                };
                self.metrics.record_transport_error(err.kind());
                Err(err.into())
            }
            WireProtocol::Envelope => {
                let reply = decode_envelope_reply(command.command_type(), &target.to_string(), status.as_u16(), &text);
                if let Err(DispatchError::Transport(err)) = &reply {
                    self.metrics.record_transport_error(err.kind());
                }
                reply
            }
        }
    }

    async fn heartbeat(&self, target: &SupervisorEndpoint) -> bool {
        let url = format!("{}{}", target.base_url(), paths::HEARTBEAT);
        match self.http.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => response
                .text()
                .await
                .map(|body| body.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            Ok(response) => {
                debug!(%target, status = response.status().as_u16(), "heartbeat rejected");
                false
            }
            Err(e) => {
                debug!(%target, error = %e, "heartbeat failed");
                false
            }
        }
    }

    async fn resources(&self, target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError> {
        let url = format!("{}{}", target.base_url(), paths::RESOURCES);
        let response = self.http.get(&url).send().await.map_err(|e| self.failed(target, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = TransportError::Status {
                target: target.to_string(),
                code: status.as_u16(),
                body,
            };
            self.metrics.record_transport_error(err.kind());
            return Err(err.into());
        }

        let text = response.text().await.map_err(|e| self.failed(target, e))?;
        serde_json::from_str(&text).map_err(|e| ProtocolError::MalformedResponse(e.to_string()).into())
    }
}
