use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{any, get, post},
};
use serde_json::Value;
use tracing::{debug, warn};
use vigil_core::TaskSupervisor;
use vigil_model::{CommandEnvelope, ErrorKind, decode_command};

use crate::{CommandReply, LocalSupervisorProxy, paths};

/// HTTP front of a supervisor node.
pub struct CommandReceiver {
    local: Arc<LocalSupervisorProxy>,
}

impl CommandReceiver {
    pub fn new(supervisor: Arc<TaskSupervisor>) -> Self {
        Self {
            local: Arc::new(LocalSupervisorProxy::new(supervisor)),
        }
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - POST /supervisor/command - plain-text replies, always `200`
    /// - POST /v2/supervisor/command - envelope replies, `400` on protocol errors
    /// - ANY /supervisor/heartbeat - `true`
    /// - GET|POST /supervisor/resources - host capacity
    pub fn router(self) -> Router {
        Router::new()
            .route(paths::COMMAND, post(legacy_command))
            .route(paths::COMMAND_V2, post(envelope_command))
            .route(paths::HEARTBEAT, any(heartbeat))
            .route(paths::RESOURCES, get(resources).post(resources))
            .with_state(self.local)
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /supervisor/command
async fn legacy_command(State(local): State<Arc<LocalSupervisorProxy>>, body: String) -> Response {
    let command = match decode_command(&body) {
        Ok(command) => command,
        Err(e) => {
            warn!(error = %e, "rejected command");
            return plain(e.to_string());
        }
    };

    let command_type = command.command_type();
    match local.execute(command).await {
        Ok(CommandReply::Endpoint(endpoint)) => Json(endpoint).into_response(),
        Ok(CommandReply::Flag(flag)) => plain(flag.to_string()),
        Err(e) => {
            warn!(command = %command_type, error = %e, "command failed");
            plain(e.to_string())
        }
    }
}

/// POST /v2/supervisor/command
async fn envelope_command(
    State(local): State<Arc<LocalSupervisorProxy>>,
    body: String,
) -> (StatusCode, Json<CommandEnvelope<Value>>) {
    let command = match decode_command(&body) {
        Ok(command) => command,
        Err(e) => {
            warn!(error = %e, "rejected command");
            return (
                StatusCode::BAD_REQUEST,
                Json(CommandEnvelope::failed(ErrorKind::Protocol, e.to_string())),
            );
        }
    };

    let command_type = command.command_type();
    match local.execute(command).await {
        Ok(reply) => match serde_json::to_value(&reply) {
            Ok(data) => {
                debug!(command = %command_type, "command executed");
                (StatusCode::OK, Json(CommandEnvelope::ok(data)))
            }
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CommandEnvelope::failed(ErrorKind::Protocol, e.to_string())),
            ),
        },
        Err(e) => {
            warn!(command = %command_type, error = %e, "command failed");
            (StatusCode::OK, Json(CommandEnvelope::failed(ErrorKind::Job, e.to_string())))
        }
    }
}

/// ANY /supervisor/heartbeat
async fn heartbeat() -> Response {
    plain("true".to_string())
}

/// GET|POST /supervisor/resources
async fn resources(State(local): State<Arc<LocalSupervisorProxy>>) -> impl IntoResponse {
    Json(local.supervisor().endpoint_info())
}

fn plain(body: String) -> Response {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
