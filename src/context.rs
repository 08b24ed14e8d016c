//! Run-scoped lifetime context
//!
//! A `RunContext` lives as long as one test run. It carries the
//! cancellation token that marks the end of the run and a wait group of
//! outstanding asynchronous work (container teardown). The test driver
//! calls [`RunContext::shutdown`] after the last test case; it returns only
//! once every registered unit of work has completed.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Counter of outstanding work plus a notifier fired when it drains
#[derive(Default)]
struct WaitGroup {
    count: AtomicUsize,
    drained: Notify,
}

/// Shared handle to the lifetime of a test run
#[derive(Clone, Default)]
pub struct RunContext {
    work: Arc<WaitGroup>,
    cancel: CancellationToken,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one unit of outstanding work.
    ///
    /// The unit is released when the returned guard is dropped, including
    /// during unwinding or when the owning task is aborted.
    pub fn register_work(&self) -> WorkGuard {
        let previous = self.work.count.fetch_add(1, Ordering::SeqCst);
        debug!("Registered outstanding work ({} in flight)", previous + 1);
        WorkGuard {
            work: self.work.clone(),
        }
    }

    /// Number of units of work not yet released
    pub fn outstanding(&self) -> usize {
        self.work.count.load(Ordering::SeqCst)
    }

    /// Mark the run as finished
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the run has been cancelled
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Token for callers that want to select on the end of the run
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait until all outstanding work has been released
    pub async fn wait(&self) {
        loop {
            let notified = self.work.drained.notified();
            tokio::pin!(notified);
            // Register interest before checking the count so a release
            // between the check and the await is not missed.
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Cancel the run, then wait for outstanding work to drain
    pub async fn shutdown(&self) {
        self.cancel();
        self.wait().await;
    }

    /// Like [`shutdown`](Self::shutdown) but gives up after `timeout`.
    ///
    /// Returns `true` when all work drained in time.
    pub async fn shutdown_timeout(&self, timeout: Duration) -> bool {
        self.cancel();
        tokio::time::timeout(timeout, self.wait()).await.is_ok()
    }
}

impl fmt::Debug for RunContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("outstanding", &self.outstanding())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// One registered unit of outstanding work, released on drop
pub struct WorkGuard {
    work: Arc<WaitGroup>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.work.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.work.drained.notify_waiters();
        }
    }
}
