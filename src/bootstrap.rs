//! Bootstrap entry point
//!
//! [`Bootstrap::new`] only resolves configuration. Nothing is launched until
//! [`Bootstrap::start`] is called with the run context, which provisions the
//! backend and returns the [`Injector`] bound to it.

use std::fmt;
use std::marker::PhantomData;

use tracing::info;

use crate::config::{Config, ConfigOption};
use crate::context::RunContext;
use crate::error::Result;
use crate::inject::Inject;
use crate::injector::Injector;
use crate::provision::provision;

/// A lazily provisioned MinIO backend for holders of type `T`
pub struct Bootstrap<T> {
    config: Config,
    _deps: PhantomData<fn(T) -> T>,
}

impl<T: Inject> Bootstrap<T> {
    /// Resolve defaults, then `options`, then the environment
    pub fn new(options: impl IntoIterator<Item = ConfigOption>) -> Self {
        let mut config = Config::with_options(options);
        config.apply_env();
        Self::from_config(config)
    }

    /// Use `config` as is, ignoring the environment
    pub fn from_config(config: Config) -> Self {
        Self {
            config,
            _deps: PhantomData,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provision the backend and return the injector bound to it
    pub async fn start(&self, ctx: &RunContext) -> Result<Injector<T>> {
        let backend = provision(ctx, &self.config).await?;
        info!("MinIO bootstrap ready: {:?}", backend);
        Ok(Injector::new(ctx.clone(), self.config.clone(), backend))
    }
}

impl<T> fmt::Debug for Bootstrap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrap")
            .field("config", &self.config)
            .finish()
    }
}
