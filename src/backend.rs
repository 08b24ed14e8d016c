//! Backend abstractions
//!
//! A backend is a running MinIO reachable at `host:port` with a pair of
//! root credentials. It is either an ephemeral container launched for this
//! run or a hosted instance whose lifecycle belongs to someone else.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::BoxError;

/// Default root user for launched containers
pub const DEFAULT_USERNAME: &str = "minioadmin";
/// Default root password for launched containers
pub const DEFAULT_PASSWORD: &str = "minioadmin";

/// Access key / secret key pair
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Options passed to a launcher when starting an instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub credentials: Credentials,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            credentials: Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD),
        }
    }
}

/// Options for terminating an ephemeral instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminateOptions {
    /// Grace period before the container is killed (engine default if None)
    pub stop_timeout: Option<Duration>,
    /// Remove anonymous volumes along with the container
    pub remove_volumes: bool,
}

impl Default for TerminateOptions {
    fn default() -> Self {
        Self {
            stop_timeout: None,
            remove_volumes: true,
        }
    }
}

/// A launched MinIO instance as exposed by the orchestration engine
#[async_trait]
pub trait MinioInstance: Send + Sync {
    /// Resolve `host:port` of the S3 API
    async fn connection_string(&self) -> Result<String, BoxError>;

    /// Stop and remove the instance
    async fn terminate(&self, options: TerminateOptions) -> Result<(), BoxError>;

    fn username(&self) -> &str;

    fn password(&self) -> &str;
}

/// Starts MinIO instances from an image reference
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(
        &self,
        image: &str,
        options: &LaunchOptions,
    ) -> Result<Arc<dyn MinioInstance>, BoxError>;
}

/// A fully resolved backend
#[derive(Clone)]
pub enum BackendHandle {
    /// Launched for this run; terminating it stops the instance
    Ephemeral {
        instance: Arc<dyn MinioInstance>,
        url: String,
        credentials: Credentials,
    },
    /// Owned elsewhere; terminating it does nothing
    Hosted { url: String, credentials: Credentials },
}

impl BackendHandle {
    /// `host:port` of the S3 API
    pub fn connection_string(&self) -> &str {
        match self {
            BackendHandle::Ephemeral { url, .. } | BackendHandle::Hosted { url, .. } => url,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        match self {
            BackendHandle::Ephemeral { credentials, .. }
            | BackendHandle::Hosted { credentials, .. } => credentials,
        }
    }

    pub fn username(&self) -> &str {
        &self.credentials().username
    }

    pub fn password(&self) -> &str {
        &self.credentials().password
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, BackendHandle::Ephemeral { .. })
    }

    /// Terminate the backend. A no-op for hosted backends.
    pub async fn terminate(&self, options: TerminateOptions) -> Result<(), BoxError> {
        match self {
            BackendHandle::Ephemeral { instance, .. } => instance.terminate(options).await,
            BackendHandle::Hosted { .. } => Ok(()),
        }
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_ephemeral() { "Ephemeral" } else { "Hosted" };
        f.debug_struct(kind)
            .field("url", &self.connection_string())
            .field("credentials", self.credentials())
            .finish()
    }
}
