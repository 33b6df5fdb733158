use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_DIRECTIVE: &str = "uatu_pricewatch=info";

/// Filter built from `RUST_LOG` when it is set, otherwise the crate default.
pub fn env_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVE))
}

/// Install the global subscriber. Logs go to stderr; stdout carries the price reports.
pub fn init() {
    let rust_log = std::env::var("RUST_LOG").ok();

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .try_init();
}
