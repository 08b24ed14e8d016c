//! Deferred teardown of ephemeral instances
//!
//! A [`Terminator`] turns a terminate function into a deferred action that
//! decides when the instance goes away. [`spawn_deferred`] registers one
//! unit of work on the run context, then runs the action on its own task and
//! releases the unit once the action completes. The run context therefore
//! cannot finish shutting down while a container is still being removed.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{MinioInstance, TerminateOptions};
use crate::context::RunContext;
use crate::error::{BoxError, Error};

/// Terminates an instance once, with the given options
pub type TerminateFn =
    Box<dyn FnOnce(TerminateOptions) -> BoxFuture<'static, Result<(), BoxError>> + Send>;

/// Future returned by a terminator, run on a dedicated task
pub type DeferredAction = BoxFuture<'static, ()>;

/// Strategy deciding when an ephemeral instance is terminated
pub trait Terminator: Send + Sync {
    fn synchronize(&self, ctx: RunContext, terminate: TerminateFn) -> DeferredAction;
}

impl<F> Terminator for F
where
    F: Fn(RunContext, TerminateFn) -> DeferredAction + Send + Sync,
{
    fn synchronize(&self, ctx: RunContext, terminate: TerminateFn) -> DeferredAction {
        self(ctx, terminate)
    }
}

/// Terminate when the run context is cancelled (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerSync;

impl Terminator for ContainerSync {
    fn synchronize(&self, ctx: RunContext, terminate: TerminateFn) -> DeferredAction {
        Box::pin(async move {
            ctx.cancelled().await;
            debug!("Run finished, terminating minio container");
            terminate_logged(terminate).await;
        })
    }
}

/// Terminate as soon as the action is scheduled
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Terminator for Immediate {
    fn synchronize(&self, _ctx: RunContext, terminate: TerminateFn) -> DeferredAction {
        Box::pin(terminate_logged(terminate))
    }
}

/// Never terminate; the instance is left for external reaping
#[derive(Debug, Clone, Copy, Default)]
pub struct Detach;

impl Terminator for Detach {
    fn synchronize(&self, _ctx: RunContext, _terminate: TerminateFn) -> DeferredAction {
        Box::pin(async {
            info!("Keeping minio container alive after the run");
        })
    }
}

/// Run a terminate function, logging instead of propagating failures
pub async fn terminate_logged(terminate: TerminateFn) {
    if let Err(source) = terminate(TerminateOptions::default()).await {
        let err = Error::Termination { source };
        warn!("{}", err);
    }
}

/// Build a terminate function for a launched instance
pub fn terminate_fn(instance: Arc<dyn MinioInstance>) -> TerminateFn {
    Box::new(move |options| Box::pin(async move { instance.terminate(options).await }))
}

/// Register teardown work on `ctx` and schedule it on its own task.
///
/// The work unit is registered before the task is spawned and released
/// after the deferred action finishes, even if it panics.
pub fn spawn_deferred(
    ctx: &RunContext,
    terminator: &dyn Terminator,
    terminate: TerminateFn,
) -> JoinHandle<()> {
    let guard = ctx.register_work();
    let action = terminator.synchronize(ctx.clone(), terminate);

    tokio::spawn(async move {
        let _guard = guard;
        action.await;
    })
}
