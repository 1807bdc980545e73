use tracing_subscriber::{prelude::*, EnvFilter, Registry};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing
///
/// Logs go to stderr so that binaries can keep stdout for the documents they render.
pub fn init() {
    let logger = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr);

    let collector = Registry::default().with(logger).with(env_filter());

    // A subscriber may already be installed, e.g. by a test harness
    let _ = tracing::subscriber::set_global_default(collector);
}
