//! Logging setup for test binaries

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,minio_i9n=info";

/// Initialize logging for test binaries.
///
/// `RUST_LOG` takes precedence over [`DEFAULT_FILTER`]. Output goes through
/// the test writer so it is captured per test, and repeated calls are no-ops.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .is_ok()
    {
        tracing::debug!("minio-i9n logging initialized");
    }
}
