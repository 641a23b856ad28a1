use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber, writing to stderr.
/// Uses JSON format unless `RUST_LOG_FORMAT=text`; `RUST_LOG` overrides `default_level`.
pub fn init_tracing(default_level: Level) {
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v != "text")
        .unwrap_or(true); // Default to JSON for production

    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    if use_json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
}
