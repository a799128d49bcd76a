//! Tracing initialization and subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const SERVICE_NAME: &str = "dishlist";

/// Installs the global subscriber.
///
/// Level resolution: `RUST_LOG` if set, then `config.trace_level`, then
/// `"info"`. Human-readable events go to stderr. When `config.trace_file` is
/// set, spans are also exported as JSON lines to that file; if its directory
/// cannot be created, tracing continues without the file export.
///
/// Only the first call in a process takes effect.
///
/// # Example
///
/// ```rust
/// use dishlist::observability::init_tracing;
/// use dishlist::Config;
///
/// init_tracing(&Config {
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// });
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let mut file_error = None;
    let otel_layer = config.trace_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                file_error = Some((parent.to_path_buf(), e));
                return None;
            }
        }
        let provider = tracer::create_tracer_provider(path.clone(), SERVICE_NAME);
        Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .is_ok();

    if let Some((dir, error)) = file_error {
        tracing::warn!(dir = %dir.display(), %error, "trace file export disabled");
    }
    if installed {
        tracing::debug!(level, trace_file = ?config.trace_file, "tracing initialized");
    }
}
