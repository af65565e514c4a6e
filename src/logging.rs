//! Diagnostics go to stderr through `tracing`; stdout carries only the report.

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is not set, from the number of `-d` flags.
pub fn default_directive(debug: u8) -> &'static str {
    match debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn env_filter(debug: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are no-ops.
pub fn init(debug: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
