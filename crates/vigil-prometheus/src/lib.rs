//! Prometheus metrics backend for vigil supervisors.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`vigil_core::MetricsBackend`]
//! that exposes metrics in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use vigil_core::{LauncherRouter, TaskSupervisor};
//! use vigil_model::SupervisorEndpoint;
//! use vigil_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let supervisor = TaskSupervisor::new(SupervisorEndpoint::self_endpoint(), LauncherRouter::new())
//!     .with_metrics(Arc::new(metrics.clone()));
//!
//! let text = metrics.render()?;
//! # let _ = (supervisor, text);
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `vigil_commands_total{command, route}` - Counter
//! - `vigil_launches_total{launcher, outcome}` - Counter
//! - `vigil_launch_duration_seconds{launcher}` - Histogram
//! - `vigil_transport_errors_total{kind}` - Counter
//!
//! ## HTTP Server
//! This crate does NOT serve `/metrics`; mount [`PrometheusMetrics::render`] in
//! whatever router the node already runs.

mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
