//! Per-test bucket name allocation

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out `prefix + n` names, `n` starting at 1.
///
/// A single atomic increment per call keeps names pairwise distinct no
/// matter how many test tasks allocate concurrently.
#[derive(Debug)]
pub struct NamespaceAllocator {
    prefix: String,
    forks: AtomicU64,
}

impl NamespaceAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            forks: AtomicU64::new(0),
        }
    }

    /// Allocate the next name
    pub fn allocate(&self) -> String {
        let fork = self.forks.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{}{}", self.prefix, fork)
    }

    /// Number of names handed out so far
    pub fn allocated(&self) -> u64 {
        self.forks.load(Ordering::SeqCst)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
