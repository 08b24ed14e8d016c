//! E2E test harness for minio-i9n
//!
//! Runs the bootstrap against a real MinIO: a container launched through
//! Docker, or the instance named by `GROAT_I9N_MINIO_DSN` when set.
//!
//! ## Quick Start
//!
//! ```ignore
//! use minio_i9n_e2e::{shared_injector, TestDeps};
//!
//! #[tokio::test]
//! async fn my_test() -> anyhow::Result<()> {
//!     let deps = shared_injector().await.inject(TestDeps::default()).await;
//!     deps.put_object("key", b"data").await?;
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use minio_i9n::docker::{session_id, SESSION_LABEL};
use minio_i9n::{
    with_bucket_prefix, with_terminator, Bootstrap, Detach, Inject, Injected, Injector, RunContext,
};
use tokio::sync::OnceCell;
use tracing::info;

/// Dependencies handed to each e2e test
#[derive(Default, Clone)]
pub struct TestDeps {
    pub client: Option<S3Client>,
    pub bucket: String,
    pub url: String,
}

impl Inject for TestDeps {
    fn inject(&mut self, value: Injected) {
        match value {
            Injected::Client(client) => self.client = Some(client),
            Injected::BucketName(bucket) => self.bucket = bucket,
            Injected::Url(url) => self.url = url,
        }
    }
}

impl TestDeps {
    fn client(&self) -> Result<&S3Client> {
        self.client.as_ref().context("no S3 client injected")
    }

    /// Put an object into this test's bucket
    pub async fn put_object(&self, key: &str, data: &[u8]) -> Result<()> {
        self.client()?
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .context("Failed to put object")?;
        Ok(())
    }

    /// Get object content from this test's bucket
    pub async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client()?
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("Failed to get object")?;

        Ok(response.body.collect().await?.into_bytes().to_vec())
    }

    /// List all keys in this test's bucket
    pub async fn list_objects(&self) -> Result<Vec<String>> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let mut request = self.client()?.list_objects_v2().bucket(&self.bucket);
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let response = request.send().await?;
            for obj in response.contents.unwrap_or_default() {
                if let Some(key) = obj.key {
                    objects.push(key);
                }
            }

            if response.is_truncated.unwrap_or(false) {
                continuation_token = response.next_continuation_token;
            } else {
                break;
            }
        }

        Ok(objects)
    }
}

/// Run context and injector shared by every test in a binary
pub struct SharedMinio {
    pub ctx: RunContext,
    pub injector: Injector<TestDeps>,
}

static SHARED: OnceCell<SharedMinio> = OnceCell::const_new();

/// Get the shared run, provisioning MinIO on first use.
///
/// Each `#[tokio::test]` owns its runtime and test binaries exit without
/// running destructors, so no test can outlive the others to tear the
/// shared container down. The shared run therefore detaches explicitly:
/// its container is left running and labelled with [`SESSION_LABEL`] for
/// reaping, e.g. `docker rm -f $(docker ps -aq --filter label=minio-i9n.session)`.
/// Tests that need teardown start their own [`Bootstrap`].
pub async fn shared_minio() -> &'static SharedMinio {
    SHARED
        .get_or_init(|| async {
            minio_i9n::init_logging();
            let ctx = RunContext::new();
            let injector = Bootstrap::new(vec![
                with_bucket_prefix("e2e-"),
                with_terminator(Detach),
            ])
            .start(&ctx)
            .await
            .expect("Failed to bootstrap shared MinIO");
            if injector.backend().is_ephemeral() {
                info!(
                    "Shared MinIO at {} ({}={})",
                    injector.url(),
                    SESSION_LABEL,
                    session_id()
                );
            } else {
                info!("Shared MinIO at {}", injector.url());
            }
            SharedMinio { ctx, injector }
        })
        .await
}

/// Get the shared injector, provisioning MinIO on first use
pub async fn shared_injector() -> &'static Injector<TestDeps> {
    &shared_minio().await.injector
}
