//! Docker-backed launcher for ephemeral MinIO instances
//!
//! Each launch creates a uniquely named container publishing the S3 port on
//! an ephemeral host port. Containers carry a session label so that leftovers
//! from crashed runs can be found and reaped externally.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bollard::container::{
    Config as ContainerConfig, CreateContainerOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::image::CreateImageOptions;
use bollard::models::{HostConfig, PortBinding};
use bollard::Docker;
use futures::StreamExt;
use once_cell::sync::Lazy;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::backend::{Credentials, LaunchOptions, Launcher, MinioInstance, TerminateOptions};
use crate::client;
use crate::error::{BoxError, Error, Result};

/// Port of the S3 API inside the container
const MINIO_PORT: &str = "9000/tcp";
/// Label carrying the per-process session id
pub const SESSION_LABEL: &str = "minio-i9n.session";
const CONTAINER_NAME_PREFIX: &str = "minio-i9n";
const DEFAULT_READINESS_ATTEMPTS: u32 = 30;
const DEFAULT_READINESS_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies containers launched by this process
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Session id stamped on every container launched by this process
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Launches MinIO through the local Docker engine
#[derive(Debug, Clone)]
pub struct DockerLauncher {
    /// How many times to probe the S3 API before giving up
    pub readiness_attempts: u32,
    /// Delay between readiness probes
    pub readiness_interval: Duration,
}

impl Default for DockerLauncher {
    fn default() -> Self {
        Self {
            readiness_attempts: DEFAULT_READINESS_ATTEMPTS,
            readiness_interval: DEFAULT_READINESS_INTERVAL,
        }
    }
}

impl DockerLauncher {
    async fn pull_image(docker: &Docker, image: &str) {
        info!("Pulling MinIO image {}...", image);
        let mut stream = docker.create_image(
            Some(CreateImageOptions {
                from_image: image,
                ..Default::default()
            }),
            None,
            None,
        );
        while let Some(result) = stream.next().await {
            if let Err(e) = result {
                warn!("Image pull warning: {}", e);
            }
        }
    }

    async fn create_container(
        docker: &Docker,
        image: &str,
        credentials: &Credentials,
    ) -> Result<(String, String)> {
        let name = format!("{}-{}", CONTAINER_NAME_PREFIX, Uuid::new_v4());

        let mut port_bindings = HashMap::new();
        port_bindings.insert(
            MINIO_PORT.to_string(),
            Some(vec![PortBinding {
                host_ip: Some("0.0.0.0".to_string()),
                host_port: None,
            }]),
        );

        let host_config = HostConfig {
            port_bindings: Some(port_bindings),
            ..Default::default()
        };

        let mut exposed_ports = HashMap::new();
        exposed_ports.insert(MINIO_PORT, HashMap::new());

        let mut labels = HashMap::new();
        labels.insert(SESSION_LABEL, session_id());

        let env_user = format!("MINIO_ROOT_USER={}", credentials.username);
        let env_pass = format!("MINIO_ROOT_PASSWORD={}", credentials.password);
        let config = ContainerConfig {
            image: Some(image),
            env: Some(vec![env_user.as_str(), env_pass.as_str()]),
            cmd: Some(vec!["server", "/data"]),
            exposed_ports: Some(exposed_ports),
            labels: Some(labels),
            host_config: Some(host_config),
            ..Default::default()
        };

        let container = docker
            .create_container(
                Some(CreateContainerOptions {
                    name: name.as_str(),
                    platform: None,
                }),
                config,
            )
            .await?;

        Ok((container.id, name))
    }

    async fn wait_for_minio(&self, instance: &DockerMinio) -> Result<()> {
        info!("Waiting for MinIO to be ready...");
        let endpoint = instance.resolve_endpoint().await?;
        let s3_client = client::new_client(&endpoint, &instance.credentials);
        let mut attempts = 0;

        loop {
            match s3_client.list_buckets().send().await {
                Ok(_) => {
                    info!("MinIO is ready at {}", endpoint);
                    return Ok(());
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= self.readiness_attempts {
                        return Err(Error::Readiness {
                            attempts,
                            message: e.to_string(),
                        });
                    }
                    debug!("MinIO not ready yet (attempt {}): {}", attempts, e);
                    sleep(self.readiness_interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl Launcher for DockerLauncher {
    async fn launch(
        &self,
        image: &str,
        options: &LaunchOptions,
    ) -> std::result::Result<Arc<dyn MinioInstance>, BoxError> {
        let docker = Docker::connect_with_local_defaults().map_err(Error::from)?;

        Self::pull_image(&docker, image).await;

        info!("Creating MinIO container...");
        let (id, name) = Self::create_container(&docker, image, &options.credentials).await?;

        let instance = DockerMinio {
            docker,
            id,
            name,
            host: docker_host(),
            credentials: options.credentials.clone(),
        };

        let started: Result<()> = async {
            instance
                .docker
                .start_container(&instance.id, None::<StartContainerOptions<String>>)
                .await?;
            info!("MinIO container started: {}", instance.name);
            self.wait_for_minio(&instance).await
        }
        .await;

        if let Err(e) = started {
            warn!("Removing MinIO container {} after failed start", instance.name);
            if let Err(cleanup) = instance.terminate(TerminateOptions::default()).await {
                warn!("Failed to remove MinIO container {}: {}", instance.name, cleanup);
            }
            return Err(e.into());
        }

        Ok(Arc::new(instance))
    }
}

/// A MinIO container managed through the Docker API
pub struct DockerMinio {
    docker: Docker,
    id: String,
    name: String,
    host: String,
    credentials: Credentials,
}

impl DockerMinio {
    /// Container name
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn resolve_endpoint(&self) -> Result<String> {
        let inspect = self.docker.inspect_container(&self.id, None).await?;

        let port = inspect
            .network_settings
            .and_then(|settings| settings.ports)
            .and_then(|mut ports| ports.remove(MINIO_PORT))
            .flatten()
            .and_then(|bindings| bindings.into_iter().find_map(|b| b.host_port))
            .filter(|port| !port.is_empty())
            .ok_or_else(|| Error::Readiness {
                attempts: 0,
                message: format!("container {} does not publish {}", self.name, MINIO_PORT),
            })?;

        Ok(format!("{}:{}", self.host, port))
    }
}

#[async_trait]
impl MinioInstance for DockerMinio {
    async fn connection_string(&self) -> std::result::Result<String, BoxError> {
        Ok(self.resolve_endpoint().await?)
    }

    async fn terminate(&self, options: TerminateOptions) -> std::result::Result<(), BoxError> {
        info!("Stopping MinIO container: {}", self.name);

        let stop = options.stop_timeout.map(|timeout| StopContainerOptions {
            t: timeout.as_secs() as i64,
        });
        // Removal below is forced, so a failed graceful stop is not fatal.
        if let Err(e) = self.docker.stop_container(&self.id, stop).await {
            debug!("Graceful stop of {} failed: {}", self.name, e);
        }

        self.docker
            .remove_container(
                &self.id,
                Some(RemoveContainerOptions {
                    force: true,
                    v: options.remove_volumes,
                    ..Default::default()
                }),
            )
            .await
            .map_err(Error::from)?;

        Ok(())
    }

    fn username(&self) -> &str {
        &self.credentials.username
    }

    fn password(&self) -> &str {
        &self.credentials.password
    }
}

/// Host on which published container ports are reachable
fn docker_host() -> String {
    host_from_docker_env(env::var("DOCKER_HOST").ok().as_deref())
}

fn host_from_docker_env(docker_host: Option<&str>) -> String {
    docker_host
        .and_then(|value| Url::parse(value).ok())
        .filter(|url| matches!(url.scheme(), "tcp" | "http" | "https"))
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "127.0.0.1".to_string())
}
