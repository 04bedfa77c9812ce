//! Tracing subscriber setup.
//!
//! Front-ends call [`init`] once at startup. The filter defaults to `info`
//! and can be overridden with the standard `RUST_LOG` environment variable.

use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber with the `info` level default.
pub fn init() {
    init_with_filter("info");
}

/// Initializes the global tracing subscriber with a custom default filter.
///
/// `RUST_LOG` takes precedence when set. Calling this more than once keeps
/// the first subscriber.
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let timer = LocalTime::new(format_description!("[hour]:[minute]:[second]"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .try_init();
}
