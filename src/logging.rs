use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

fn resolve_filter() -> EnvFilter {
    EnvFilter::try_from_env("CPG_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Logs go to stderr; stdout carries command
/// output only.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
