// Logging initialization for the server process
use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Filter for the subscriber. A valid `rust_log` value wins outright;
/// otherwise only this crate and the HTTP trace layer log, at `info` or
/// `debug` when verbose.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("fxconv={level},tower_http={level}"))
}

pub fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(log_filter(verbose, rust_log.as_deref()))
        .init();
}
