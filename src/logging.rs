//! Tracing setup for the binaries.
//!
//! Log output goes to stderr so stdout carries only results. Verbosity is
//! controlled with `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=swapi_resolver=debug`.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. Calling it twice is a no-op.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
