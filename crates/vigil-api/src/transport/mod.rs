//! Moving commands to remote supervisors.

use std::time::Duration;

use async_trait::async_trait;
use vigil_model::{EndpointInfo, SupervisorEndpoint, TaskCommand};

use crate::{CommandReply, DispatchError};

mod http;
pub use http::HttpTransport;

/// Sends commands to the supervisor at `target` and brings back the reply.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn send(&self, target: &SupervisorEndpoint, command: &TaskCommand) -> Result<CommandReply, DispatchError>;

    /// Node-level reachability; any failure reads as `false`.
    async fn heartbeat(&self, target: &SupervisorEndpoint) -> bool;

    async fn resources(&self, target: &SupervisorEndpoint) -> Result<EndpointInfo, DispatchError>;
}

/// Which command endpoint of the receiver is spoken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireProtocol {
    /// Plain-text replies, failures indistinguishable from status codes.
    Legacy,
    /// JSON envelope replies.
    #[default]
    Envelope,
}

impl WireProtocol {
    pub fn command_path(&self) -> &'static str {
        match self {
            WireProtocol::Legacy => crate::paths::COMMAND,
            WireProtocol::Envelope => crate::paths::COMMAND_V2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request deadline.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub protocol: WireProtocol,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(60),
            protocol: WireProtocol::default(),
        }
    }
}

impl TransportConfig {
    pub fn with_protocol(mut self, protocol: WireProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
