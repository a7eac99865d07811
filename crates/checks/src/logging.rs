//! Tracing setup shared by every check binary.
//!
//! Diagnostics go to stderr: stdout is reserved for the status line the
//! monitoring system parses.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. Call once per process.
///
/// `RUST_LOG` wins when set; otherwise our crates log at `debug`
/// with `--verbose` and at `warn` without it.
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("nagcheck_checks={level},nagcheck_core={level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
