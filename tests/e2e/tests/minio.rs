//! End-to-end tests against a real MinIO
//!
//! Run with `cargo test -p minio-i9n-e2e --features docker`.

use std::collections::HashSet;

use anyhow::Result;
use minio_i9n::{with_bucket_prefix, Bootstrap, RunContext};
use minio_i9n_e2e::{shared_injector, shared_minio, TestDeps};

#[tokio::test]
#[cfg_attr(not(feature = "docker"), ignore = "requires Docker")]
async fn test_put_and_get_in_isolated_bucket() -> Result<()> {
    let deps = shared_injector().await.inject(TestDeps::default()).await;

    assert!(deps.bucket.starts_with("e2e-"));
    deps.put_object("hello.txt", b"hello world").await?;
    assert_eq!(deps.get_object("hello.txt").await?, b"hello world");
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "docker"), ignore = "requires Docker")]
async fn test_parallel_tests_do_not_share_objects() -> Result<()> {
    let injector = shared_injector().await;
    let first = injector.inject(TestDeps::default()).await;
    let second = injector.inject(TestDeps::default()).await;

    assert_ne!(first.bucket, second.bucket);
    assert_eq!(first.url, second.url);

    first.put_object("only-in-first", b"1").await?;
    assert_eq!(first.list_objects().await?, vec!["only-in-first".to_string()]);
    assert!(second.list_objects().await?.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[cfg_attr(not(feature = "docker"), ignore = "requires Docker")]
async fn test_concurrent_injections_create_distinct_buckets() -> Result<()> {
    let injector = shared_injector().await;

    let handles: Vec<_> = (0..16)
        .map(|_| tokio::spawn(async move { injector.inject(TestDeps::default()).await.bucket }))
        .collect();

    let mut buckets = HashSet::new();
    for handle in handles {
        assert!(buckets.insert(handle.await?));
    }
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "docker"), ignore = "requires Docker")]
async fn test_ephemeral_backend_gone_after_shutdown() -> Result<()> {
    minio_i9n::init_logging();
    let ctx = RunContext::new();
    let injector = Bootstrap::<TestDeps>::new(vec![with_bucket_prefix("lifecycle-")])
        .start(&ctx)
        .await?;

    let deps = injector.inject(TestDeps::default()).await;
    deps.put_object("probe", b"x").await?;

    ctx.shutdown().await;
    assert_eq!(ctx.outstanding(), 0);

    if injector.backend().is_ephemeral() {
        assert!(deps.get_object("probe").await.is_err());
    }
    Ok(())
}

#[tokio::test]
#[cfg_attr(not(feature = "docker"), ignore = "requires Docker")]
async fn test_shared_run_holds_no_pending_teardown() -> Result<()> {
    let shared = shared_minio().await;

    // Detached teardown completes at once, so nothing is left to drop with
    // the runtime that provisioned the shared container.
    tokio::time::timeout(std::time::Duration::from_secs(10), shared.ctx.wait()).await?;
    assert_eq!(shared.ctx.outstanding(), 0);
    assert!(!shared.ctx.is_cancelled());
    Ok(())
}
