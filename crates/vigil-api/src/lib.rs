//! Command transport and dispatch.
//!
//! Callers talk to [`TaskSupervisorProxy`]; the [`Dispatcher`] implementation
//! decides per call whether the target is this process (direct call into the
//! local [`TaskSupervisor`](vigil_core::TaskSupervisor)) or another node
//! (command sent through a [`CommandTransport`]). With the `http` feature the
//! crate also provides the receiving side, [`CommandReceiver`].

mod error;
pub use error::{DispatchError, TransportError};

mod reply;
pub use reply::{CommandReply, decode_envelope_reply, decode_legacy_reply};

pub mod transport;
pub use transport::{CommandTransport, HttpTransport, TransportConfig, WireProtocol};

pub mod proxy;
pub use proxy::{Dispatcher, LocalSupervisorProxy, RemoteSupervisorProxy, TaskSupervisorProxy, routes_locally};

#[cfg(feature = "http")]
mod receiver;

#[cfg(feature = "http")]
pub use receiver::CommandReceiver;

#[cfg(feature = "http")]
pub use axum;

/// Paths served by a supervisor node.
pub mod paths {
    pub const COMMAND: &str = "/supervisor/command";
    pub const COMMAND_V2: &str = "/v2/supervisor/command";
    pub const HEARTBEAT: &str = "/supervisor/heartbeat";
    pub const RESOURCES: &str = "/supervisor/resources";
}
