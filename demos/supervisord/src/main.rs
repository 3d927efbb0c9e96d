use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;
use tracing::{info, warn};

use vigil_api::CommandReceiver;
use vigil_core::{LauncherRouter, MetricsHandle, SupervisorConfig, TaskSupervisor, advertise_host};
use vigil_exec::{FnContext, FnLauncher, ProcessLauncher};
use vigil_model::SupervisorEndpoint;
use vigil_observe::{LoggerConfig, LoggerFormat, LoggerLevel, init_logger};
use vigil_pod::{KubeApiConfig, KubeRestApi, PodConfig, PodLauncher};
use vigil_prometheus::PrometheusMetrics;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1) Logger
    let cfg = LoggerConfig {
        format: env_or("VIGIL_LOG_FORMAT", "text").parse::<LoggerFormat>()?,
        level: LoggerLevel::new(&env_or("VIGIL_LOG_LEVEL", "info"))?,
        ..Default::default()
    };
    init_logger(&cfg)?;
    info!("logger initialized");

    // 2) Listener; the supervisor's own endpoint is the bound address
    let bind = env_or("VIGIL_BIND", "0.0.0.0:0");
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("bind {bind}"))?;
    let local = listener.local_addr()?;
    let host = if local.ip().is_unspecified() {
        advertise_host()
    } else {
        local.ip().to_string()
    };
    let endpoint = SupervisorEndpoint::new(host, local.port());
    info!(%endpoint, "listening on {local}");

    // 3) Launchers
    let metrics = PrometheusMetrics::new()?;
    let handle: MetricsHandle = Arc::new(metrics.clone());

    let functions = FnLauncher::new();
    functions.register("tick", tick);

    let mut router = LauncherRouter::new()
        .with(Arc::new(ProcessLauncher::new()))
        .with(Arc::new(functions));
    if let Ok(url) = env::var("VIGIL_KUBE_URL") {
        let mut api = KubeApiConfig::new(url);
        if let Ok(token) = env::var("VIGIL_KUBE_TOKEN") {
            api = api.with_bearer_token(token);
        }
        let pods = PodConfig {
            namespace: env_or("VIGIL_KUBE_NAMESPACE", "default"),
            ..PodConfig::default()
        };
        router.register(Arc::new(PodLauncher::new(Arc::new(KubeRestApi::new(api)?), pods)));
    }
    info!(launchers = ?router.names(), "launchers registered");

    // 4) Supervisor
    let supervisor = Arc::new(
        TaskSupervisor::new(endpoint, router)
            .with_config(SupervisorConfig::default())
            .with_metrics(handle),
    );

    // 5) HTTP
    let app = CommandReceiver::new(Arc::clone(&supervisor)).router().merge(
        Router::new()
            .route("/metrics", get(render_metrics))
            .with_state(Arc::new(metrics)),
    );

    info!("press Ctrl+C to stop");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "cannot listen for Ctrl+C");
            }
        })
        .await?;

    info!("shutting down...");
    let destroyed = supervisor.destroy_all().await;
    info!(destroyed, "executors destroyed");
    Ok(())
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

async fn render_metrics(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, metrics.content_type())], body).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// Sample in-process job: logs once a second until stopped.
async fn tick(ctx: FnContext) -> Result<(), String> {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            _ = ctx.cancel.cancelled() => {
                info!(executor = %ctx.identifier, ticks, "tick stopped");
                return Ok(());
            }
            _ = interval.tick() => ticks += 1,
        }
    }
}
