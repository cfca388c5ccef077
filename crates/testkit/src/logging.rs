//! Log output for integration tests.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "outcome_core=trace,outcome_shared=debug";

/// Install a test-friendly fmt subscriber once per process.
///
/// `RUST_LOG` overrides the default directives. Later calls are no-ops.
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
