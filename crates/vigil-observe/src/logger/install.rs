use time::{format_description::well_known::Rfc3339, UtcOffset};
use tracing_subscriber::{
    Layer, Registry,
    fmt::{self, time::OffsetTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

type Output = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Build the output layer for `cfg`, filter it by the configured level and
/// install it as the process-wide subscriber.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    if tracing::dispatcher::has_been_set() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let filtered = output(cfg)?.with_filter(cfg.level.filter()?);
    tracing_subscriber::registry()
        .with(filtered)
        .try_init()
        .map_err(|e| LoggerError::Setup(e.to_string()))
}

fn output(cfg: &LoggerConfig) -> Result<Output, LoggerError> {
    let layer = match cfg.format {
        LoggerFormat::Text => fmt::layer()
            .with_timer(local_rfc3339())
            .with_target(cfg.with_targets)
            .with_ansi(cfg.use_color)
            .boxed(),
        LoggerFormat::Json => fmt::layer()
            .json()
            .with_timer(local_rfc3339())
            .with_target(cfg.with_targets)
            .with_current_span(true)
            .boxed(),
        LoggerFormat::Journald => journald()?,
    };
    Ok(layer)
}

/// Local offset when the platform can tell it, UTC otherwise.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald() -> Result<Output, LoggerError> {
    Ok(tracing_journald::layer()?.boxed())
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald() -> Result<Output, LoggerError> {
    Err(LoggerError::JournaldUnavailable)
}
