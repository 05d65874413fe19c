use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber: `RUST_LOG` (falling back to the
/// configured level) filtering into flattened JSON output with source
/// locations, suitable for log aggregation.
///
/// Must be called once at startup; a second call is a no-op so test
/// harnesses can share a process.
pub fn init_tracing(service_name: &str, log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    if result.is_ok() {
        tracing::info!(service = service_name, "Tracing initialized");
    }
}
