use crate::error::{GatewayError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default `info` filter. `log` records from
/// dependencies are forwarded to tracing.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = Registry::default()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_current_span(false)))
        .with((!json).then(|| fmt::layer()));

    tracing_log::LogTracer::init().map_err(|e| GatewayError::Telemetry(e.to_string()))?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GatewayError::Telemetry(e.to_string()))?;

    Ok(())
}
