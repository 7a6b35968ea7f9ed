//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Build the log filter: `RUST_LOG` wins, otherwise `level` for both crates.
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("legitscan={level},legitscan_server={level}")))
}

/// Install the global subscriber. Logs go to stderr so `scan` output on
/// stdout stays machine-readable.
pub fn init(level: &str, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
