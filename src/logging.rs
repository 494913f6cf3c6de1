use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging to stderr, so stdout stays free for reports.
/// Respects RUST_LOG; defaults to info for this crate, warn elsewhere.
pub fn init_logging() {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("survey_tally=info,warn"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}
