//! Handing resolved values to a test's dependency holder
//!
//! Every test case receives three values, each identified by a fixed tag:
//!
//! | tag            | value                                  |
//! |----------------|----------------------------------------|
//! | `s3client`     | [`aws_sdk_s3::Client`] for the backend |
//! | `s3bucketname` | the bucket created for this test       |
//! | `s3url`        | `host:port` of the backend             |
//!
//! Holders implement [`Inject`] and keep whichever values they need.
//!
//! ```
//! use minio_i9n::{Inject, Injected};
//!
//! #[derive(Default)]
//! struct Deps {
//!     client: Option<aws_sdk_s3::Client>,
//!     bucket: String,
//! }
//!
//! impl Inject for Deps {
//!     fn inject(&mut self, value: Injected) {
//!         match value {
//!             Injected::Client(client) => self.client = Some(client),
//!             Injected::BucketName(bucket) => self.bucket = bucket,
//!             Injected::Url(_) => {}
//!         }
//!     }
//! }
//! ```

use std::collections::HashMap;

use aws_sdk_s3::Client as S3Client;

pub const CLIENT_TAG: &str = "s3client";
pub const BUCKET_NAME_TAG: &str = "s3bucketname";
pub const URL_TAG: &str = "s3url";

/// A value handed to a dependency holder
#[derive(Debug, Clone)]
pub enum Injected {
    Client(S3Client),
    BucketName(String),
    Url(String),
}

impl Injected {
    /// Stable tag identifying this value
    pub fn tag(&self) -> &'static str {
        match self {
            Injected::Client(_) => CLIENT_TAG,
            Injected::BucketName(_) => BUCKET_NAME_TAG,
            Injected::Url(_) => URL_TAG,
        }
    }

    pub fn as_client(&self) -> Option<&S3Client> {
        match self {
            Injected::Client(client) => Some(client),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Injected::BucketName(value) | Injected::Url(value) => Some(value),
            Injected::Client(_) => None,
        }
    }
}

/// Receives injected values. Values a holder does not want are dropped.
pub trait Inject {
    fn inject(&mut self, value: Injected) {
        let _ = value;
    }
}

impl Inject for () {}

/// Map-based holder keyed by tag
impl Inject for HashMap<&'static str, Injected> {
    fn inject(&mut self, value: Injected) {
        self.insert(value.tag(), value);
    }
}
