//! Environment overrides applied on top of the functional options
//!
//! CI environments with a shared MinIO export its DSN so that every test
//! binary attaches to it instead of launching its own container.

use std::env;

/// Forces hosted mode when set to a non-empty URL
pub const HOSTED_DSN_VAR: &str = "GROAT_I9N_MINIO_DSN";

/// Leaves the ephemeral container running after the run when set
pub const KEEP_CONTAINER_VAR: &str = "GROAT_I9N_MINIO_KEEP";

/// Read the hosted DSN override. Empty values count as unset.
pub fn hosted_dsn() -> Option<String> {
    non_empty(env::var(HOSTED_DSN_VAR).ok())
}

/// Whether the keep-container override is set (to anything non-empty)
pub fn keep_container() -> bool {
    non_empty(env::var(KEEP_CONTAINER_VAR).ok()).is_some()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
