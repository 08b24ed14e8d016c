//! Per-test injection
//!
//! One [`Injector`] serves every test case of a run. Each call allocates a
//! fresh bucket on the shared backend, so parallel tests never see each
//! other's objects.

use std::marker::PhantomData;
use std::sync::Arc;

use aws_sdk_s3::error::DisplayErrorContext;
use tracing::debug;

use crate::allocator::NamespaceAllocator;
use crate::backend::{BackendHandle, Credentials};
use crate::client;
use crate::config::Config;
use crate::context::RunContext;
use crate::inject::{Inject, Injected};

/// Run-scoped state shared by all injector clones
struct BootstrapState {
    backend: BackendHandle,
    allocator: NamespaceAllocator,
    config: Config,
    ctx: RunContext,
}

/// Populates dependency holders with a client and an isolated bucket
pub struct Injector<T> {
    state: Arc<BootstrapState>,
    _deps: PhantomData<fn(T) -> T>,
}

impl<T> Clone for Injector<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            _deps: PhantomData,
        }
    }
}

impl<T: Inject> Injector<T> {
    pub(crate) fn new(ctx: RunContext, config: Config, backend: BackendHandle) -> Self {
        let allocator = NamespaceAllocator::new(config.bucket_prefix.clone());
        Self {
            state: Arc::new(BootstrapState {
                backend,
                allocator,
                config,
                ctx,
            }),
            _deps: PhantomData,
        }
    }

    /// Create a bucket for one test case and hand it to `to`.
    ///
    /// # Panics
    ///
    /// Panics if the bucket cannot be created. A test without its bucket
    /// cannot run, so the failure aborts that test only.
    pub async fn inject(&self, mut to: T) -> T {
        let bucket = self.state.allocator.allocate();
        let url = self.state.backend.connection_string();
        let s3_client = client::new_client(url, self.state.backend.credentials());

        if let Err(err) = client::create_bucket(&s3_client, &bucket).await {
            panic!("{}", DisplayErrorContext(&err));
        }
        debug!("Created test bucket: {}", bucket);

        to.inject(Injected::Client(s3_client));
        to.inject(Injected::BucketName(bucket));
        to.inject(Injected::Url(url.to_string()));
        to
    }
}

impl<T> Injector<T> {
    /// `host:port` of the backend
    pub fn url(&self) -> &str {
        self.state.backend.connection_string()
    }

    pub fn credentials(&self) -> &Credentials {
        self.state.backend.credentials()
    }

    pub fn backend(&self) -> &BackendHandle {
        &self.state.backend
    }

    pub fn bucket_prefix(&self) -> &str {
        self.state.allocator.prefix()
    }

    /// Number of buckets allocated so far
    pub fn forks(&self) -> u64 {
        self.state.allocator.allocated()
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    pub fn run_context(&self) -> &RunContext {
        &self.state.ctx
    }
}
