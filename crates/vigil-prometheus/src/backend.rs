use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder, exponential_buckets,
};
use vigil_core::{LaunchOutcome, MetricsBackend, Route};
use vigil_model::CommandType;

/// Collectors registered in their own [`Registry`].
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    commands: IntCounterVec,
    launches: IntCounterVec,
    launch_duration: HistogramVec,
    transport_errors: IntCounterVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register the collectors in an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let commands = IntCounterVec::new(
            Opts::new("vigil_commands_total", "Commands dispatched, by route"),
            &["command", "route"],
        )?;
        let launches = IntCounterVec::new(
            Opts::new("vigil_launches_total", "Executor launch attempts by outcome"),
            &["launcher", "outcome"],
        )?;
        let launch_duration = HistogramVec::new(
            HistogramOpts::new("vigil_launch_duration_seconds", "Time from launch to ready")
                .buckets(exponential_buckets(0.005, 2.0, 14)?),
            &["launcher"],
        )?;
        let transport_errors = IntCounterVec::new(
            Opts::new("vigil_transport_errors_total", "Failed command deliveries"),
            &["kind"],
        )?;

        registry.register(Box::new(commands.clone()))?;
        registry.register(Box::new(launches.clone()))?;
        registry.register(Box::new(launch_duration.clone()))?;
        registry.register(Box::new(transport_errors.clone()))?;

        Ok(Self {
            registry,
            commands,
            launches,
            launch_duration,
            transport_errors,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, ready to serve.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_command(&self, command: CommandType, route: Route) {
        self.commands
            .with_label_values(&[command.as_str(), route.as_str()])
            .inc();
    }

    fn record_launch(&self, launcher: &str, outcome: LaunchOutcome, elapsed: Duration) {
        self.launches
            .with_label_values(&[launcher, outcome.as_str()])
            .inc();
        if outcome == LaunchOutcome::Started {
            self.launch_duration
                .with_label_values(&[launcher])
                .observe(elapsed.as_secs_f64());
        }
    }

    fn record_transport_error(&self, kind: &str) {
        self.transport_errors.with_label_values(&[kind]).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_commands_per_route() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_command(CommandType::Start, Route::Local);
        metrics.record_command(CommandType::Start, Route::Local);
        metrics.record_command(CommandType::Destroy, Route::Remote);

        let local = metrics
            .commands
            .with_label_values(&["START", "local"])
            .get();
        assert_eq!(local, 2);
        assert_eq!(metrics.commands.with_label_values(&["DESTROY", "remote"]).get(), 1);
    }

    #[test]
    fn only_started_launches_are_timed() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_launch("process", LaunchOutcome::Started, Duration::from_millis(40));
        metrics.record_launch("process", LaunchOutcome::Reused, Duration::from_millis(1));
        metrics.record_launch("process", LaunchOutcome::Failed, Duration::from_secs(3));

        let hist = metrics.launch_duration.with_label_values(&["process"]);
        assert_eq!(hist.get_sample_count(), 1);
        assert_eq!(metrics.launches.with_label_values(&["process", "failed"]).get(), 1);
    }

    #[test]
    fn render_exposes_metric_names() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.record_transport_error("timeout");
        metrics.record_command(CommandType::IsAlive, Route::Remote);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"vigil_transport_errors_total{kind="timeout"} 1"#));
        assert!(text.contains("vigil_commands_total"));
        assert!(metrics.content_type().starts_with("text/plain"));
    }

    #[test]
    fn shared_registry_rejects_second_backend() {
        let registry = Registry::new();
        let _first = PrometheusMetrics::with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::with_registry(registry).is_err());
    }
}
