use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::error::StorageError;
use super::key::object_segments;
use super::traits::ObjectStore;

/// Filesystem-backed object store.
///
/// Objects live at `{base_path}/{namespace}/{bucket}/{key}`, where `key` may
/// contain `/` separated segments. Writes go through `{base_path}/.tmp` and are
/// renamed into place, so readers never observe a partial object.
pub struct FilesystemObjectStore {
    base_path: PathBuf,
}

impl FilesystemObjectStore {
    /// Create a new filesystem object store.
    pub async fn new(base_path: PathBuf) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path })
    }

    /// Compute the filesystem path for an object location.
    fn object_path(
        &self,
        namespace: &str,
        bucket: &str,
        key: &str,
    ) -> Result<PathBuf, StorageError> {
        let mut path = self.base_path.clone();
        for segment in object_segments(namespace, bucket, key)? {
            path.push(segment);
        }
        Ok(path)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(
        &self,
        namespace: &str,
        bucket: &str,
        key: &str,
        data: &[u8],
    ) -> Result<bool, StorageError> {
        let object_path = self.object_path(namespace, bucket, key)?;

        let temp_path = self.temp_path();
        let written = async {
            let mut temp_file = fs::File::create(&temp_path).await?;
            temp_file.write_all(data).await?;
            temp_file.sync_all().await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &object_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
