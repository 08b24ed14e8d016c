//! S3 client construction against a MinIO backend

use aws_config::BehaviorVersion;
use aws_credential_types::Credentials as StaticCredentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;

use crate::backend::Credentials;
use crate::error::{Error, Result};

/// Region MinIO answers for unless configured otherwise
pub const REGION: &str = "us-east-1";

/// Build a path-style S3 client for `host:port`
pub fn new_client(endpoint: &str, credentials: &Credentials) -> S3Client {
    let credentials = StaticCredentials::new(
        &credentials.username,
        &credentials.password,
        None,
        None,
        "minio-i9n",
    );

    let config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(REGION))
        .endpoint_url(format!("http://{}", endpoint))
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();

    S3Client::from_conf(config)
}

/// Create a bucket, mapping failures to a namespace-creation error
pub async fn create_bucket(client: &S3Client, bucket: &str) -> Result<()> {
    client
        .create_bucket()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| Error::NamespaceCreation {
            bucket: bucket.to_string(),
            source: Box::new(e),
        })?;

    Ok(())
}
