//! Structured logging, grounded on `iepathos-debtmap/src/observability/tracing.rs`.
//!
//! Default level is `warn`; each `-v` step lowers it (`info`, `debug`,
//! `trace`). `RUST_LOG` always takes precedence when set.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Call once, at process start.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
