//! Bootstrap configuration and functional options

use std::fmt;
use std::sync::Arc;

use crate::backend::{LaunchOptions, Launcher};
use crate::docker::DockerLauncher;
use crate::env;
use crate::terminator::{ContainerSync, Detach, Terminator};

/// MinIO image launched when no hosted DSN is configured
pub const DEFAULT_IMAGE: &str = "minio/minio:RELEASE.2024-01-16T16-07-38Z";

/// Resolved bootstrap configuration.
///
/// Built once from defaults, caller options and the environment, then
/// never mutated.
#[derive(Clone)]
pub struct Config {
    /// Image launched for the ephemeral backend
    pub image: String,
    /// Orchestration engine used to launch the image
    pub launcher: Arc<dyn Launcher>,
    /// Options handed to the launcher
    pub launch_options: LaunchOptions,
    /// Teardown strategy for the ephemeral backend
    pub terminator: Arc<dyn Terminator>,
    /// Attach to this DSN instead of launching anything
    pub hosted_dsn: Option<String>,
    /// Prepended to every allocated bucket name
    pub bucket_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            launcher: Arc::new(DockerLauncher::default()),
            launch_options: LaunchOptions::default(),
            terminator: Arc::new(ContainerSync),
            hosted_dsn: None,
            bucket_prefix: String::new(),
        }
    }
}

impl Config {
    /// Apply options in order over the defaults
    pub fn with_options(options: impl IntoIterator<Item = ConfigOption>) -> Self {
        let mut config = Self::default();
        for option in options {
            option(&mut config);
        }
        config
    }

    /// Apply environment overrides.
    ///
    /// A hosted DSN from the environment wins over any configured one.
    pub fn apply_env(&mut self) {
        if let Some(dsn) = env::hosted_dsn() {
            self.hosted_dsn = Some(dsn);
        }
        if env::keep_container() {
            self.terminator = Arc::new(Detach);
        }
    }

    /// True when bootstrapping will attach to a hosted backend
    pub fn is_hosted(&self) -> bool {
        self.hosted_dsn.as_deref().is_some_and(|dsn| !dsn.is_empty())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("image", &self.image)
            .field("launch_options", &self.launch_options)
            .field("hosted", &self.is_hosted())
            .field("bucket_prefix", &self.bucket_prefix)
            .finish_non_exhaustive()
    }
}

/// A functional option applied to [`Config`]
pub type ConfigOption = Box<dyn FnOnce(&mut Config) + Send>;

/// Override the teardown strategy
pub fn with_terminator(terminator: impl Terminator + 'static) -> ConfigOption {
    Box::new(move |config| config.terminator = Arc::new(terminator))
}

/// Override the prefix of allocated bucket names
pub fn with_bucket_prefix(prefix: impl Into<String>) -> ConfigOption {
    let prefix = prefix.into();
    Box::new(move |config| config.bucket_prefix = prefix)
}

/// Override the MinIO image
pub fn with_image(image: impl Into<String>) -> ConfigOption {
    let image = image.into();
    Box::new(move |config| config.image = image)
}

/// Override the orchestration engine
pub fn with_launcher(launcher: impl Launcher + 'static) -> ConfigOption {
    Box::new(move |config| config.launcher = Arc::new(launcher))
}

/// Override the options handed to the launcher
pub fn with_launch_options(options: LaunchOptions) -> ConfigOption {
    Box::new(move |config| config.launch_options = options)
}

/// Attach to an existing MinIO instead of launching one
pub fn with_hosted_dsn(dsn: impl Into<String>) -> ConfigOption {
    let dsn = dsn.into();
    Box::new(move |config| config.hosted_dsn = Some(dsn))
}
