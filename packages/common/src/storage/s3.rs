use async_trait::async_trait;
use ::s3::creds::Credentials;
use ::s3::{Bucket, Region};
use tracing::warn;

use super::error::StorageError;
use super::key::object_segments;
use super::traits::ObjectStore;
use crate::config::S3Config;

/// S3-compatible object store.
///
/// Every `(namespace, bucket, key)` location maps to the object path
/// `{namespace}/{bucket}/{key}` inside a single configured S3 bucket.
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
}

impl S3ObjectStore {
    pub fn new(config: &S3Config) -> Result<Self, StorageError> {
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", config.region));
        let region = Region::Custom {
            region: config.region.clone(),
            endpoint,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid S3 credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| StorageError::Backend(format!("invalid S3 bucket config: {e}")))?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }

    fn object_path(namespace: &str, bucket: &str, key: &str) -> Result<String, StorageError> {
        Ok(object_segments(namespace, bucket, key)?.join("/"))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        namespace: &str,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> Result<bool, StorageError> {
        let path = Self::object_path(namespace, bucket, key)?;

        let response = self
            .bucket
            .put_object(&path, data)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            warn!(path = %path, status, "S3 rejected object write");
            return Ok(false);
        }

        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
