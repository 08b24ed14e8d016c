//! minio-i9n: disposable MinIO backends for integration tests
//!
//! This library bootstraps one MinIO instance per test run and gives every
//! test case its own bucket inside it, so parallel tests never share
//! mutable storage state.
//!
//! # Architecture
//!
//! - **Bootstrap**: resolves configuration from functional options and the
//!   environment, then provisions the backend when started.
//! - **Provisioner**: attaches to a hosted instance (`GROAT_I9N_MINIO_DSN`)
//!   or launches an ephemeral container through a pluggable `Launcher`
//!   (Docker by default).
//! - **Terminator**: schedules teardown of the ephemeral container on its own
//!   task and keeps the `RunContext` from finishing until it is done.
//! - **Injector**: allocates a unique bucket per test and hands the client,
//!   bucket name and endpoint to the test's dependency holder.
//!
//! # Example
//!
//! ```no_run
//! use minio_i9n::{with_bucket_prefix, Bootstrap, Inject, Injected, RunContext};
//!
//! #[derive(Default)]
//! struct Deps {
//!     bucket: String,
//! }
//!
//! impl Inject for Deps {
//!     fn inject(&mut self, value: Injected) {
//!         if let Injected::BucketName(bucket) = value {
//!             self.bucket = bucket;
//!         }
//!     }
//! }
//!
//! # async fn example() -> minio_i9n::Result<()> {
//! let ctx = RunContext::new();
//! let injector = Bootstrap::<Deps>::new(vec![with_bucket_prefix("test-")])
//!     .start(&ctx)
//!     .await?;
//!
//! let deps = injector.inject(Deps::default()).await;
//! assert!(deps.bucket.starts_with("test-"));
//!
//! // After the last test: stop the container and wait for it to be gone
//! ctx.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod backend;
pub mod bootstrap;
pub mod client;
pub mod config;
pub mod context;
pub mod docker;
pub mod env;
pub mod error;
pub mod inject;
pub mod injector;
pub mod logging;
pub mod provision;
pub mod terminator;

pub use allocator::NamespaceAllocator;
pub use backend::{
    BackendHandle, Credentials, LaunchOptions, Launcher, MinioInstance, TerminateOptions,
};
pub use bootstrap::Bootstrap;
pub use config::{
    with_bucket_prefix, with_hosted_dsn, with_image, with_launch_options, with_launcher,
    with_terminator, Config, ConfigOption,
};
pub use context::{RunContext, WorkGuard};
pub use docker::DockerLauncher;
pub use error::{BoxError, Error, Result};
pub use inject::{Inject, Injected};
pub use injector::Injector;
pub use logging::init_logging;
pub use terminator::{ContainerSync, DeferredAction, Detach, Immediate, TerminateFn, Terminator};
