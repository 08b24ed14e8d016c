use thiserror::Error;

/// Boxed error used where a collaborator's error type is opaque
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for bootstrap operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed hosted endpoint. Fatal to the bootstrap.
    #[error("error parsing hosted DSN: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// The ephemeral instance failed to launch or could not be resolved.
    #[error("{message}: {source}")]
    Provisioning {
        message: String,
        #[source]
        source: BoxError,
    },

    /// Per-test bucket creation failed.
    #[error("error creating bucket {bucket}: {source}")]
    NamespaceCreation {
        bucket: String,
        #[source]
        source: BoxError,
    },

    /// Best-effort teardown failed. Only ever logged.
    #[error("error terminating minio container: {source}")]
    Termination {
        #[source]
        source: BoxError,
    },

    #[error("Docker error: {0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("minio not ready after {attempts} attempts: {message}")]
    Readiness { attempts: u32, message: String },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    pub(crate) fn provisioning(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Provisioning {
            message: message.into(),
            source: source.into(),
        }
    }

    /// True for a malformed hosted DSN
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// True when launching or resolving the ephemeral instance failed
    pub fn is_provisioning(&self) -> bool {
        matches!(self, Error::Provisioning { .. })
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Configuration {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, Error>;
