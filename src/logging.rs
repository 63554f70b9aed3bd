//! Logging initialization.

use tracing_subscriber::{fmt, EnvFilter};

/// Pick the filter directive: `--verbose` forces debug, otherwise the
/// configured level applies. `RUST_LOG` still wins when set.
pub fn filter_directive(verbose: bool, configured: &str) -> String {
    if verbose {
        "debug".to_string()
    } else {
        configured.to_string()
    }
}

/// Install the tracing subscriber, writing to stderr so stdout stays clean
/// for tables.
pub fn init(verbose: bool, configured: &str) {
    let directive = filter_directive(verbose, configured);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    // A subscriber may already be installed (tests, embedding)
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
