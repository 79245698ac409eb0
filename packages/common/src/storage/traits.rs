use async_trait::async_trait;

use super::error::StorageError;

/// Durable key/value storage for uploaded payloads.
///
/// Objects are addressed by `(namespace, bucket, key)`. The store does not
/// derive keys itself; callers build deterministic keys from content digests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` at the given location.
    ///
    /// Returns `Ok(true)` once the write is durable, `Ok(false)` if the backend
    /// refused it. Writing identical bytes to an existing key is a success.
    async fn put(
        &self,
        namespace: &str,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> Result<bool, StorageError>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
