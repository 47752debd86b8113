//! Diagnostic logging to stderr.
//!
//! User-facing progress goes through `OutputContext`; this is the
//! `RUST_LOG`-controlled trace underneath it.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `debug` for this
/// crate and `warn` elsewhere. Calling this twice is a no-op.
pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,devfleet_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
