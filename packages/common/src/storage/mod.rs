mod digest;
mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod s3;

use std::sync::Arc;

pub use digest::sha256_hex;
pub use error::StorageError;
pub use key::{object_segments, validate_segment};
pub use traits::ObjectStore;

use crate::config::{StorageAppConfig, StorageBackend};

/// Build the object store selected by configuration.
pub async fn from_config(
    config: &StorageAppConfig,
) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match config.backend {
        StorageBackend::Filesystem => Ok(Arc::new(
            filesystem::FilesystemObjectStore::new(config.path.clone()).await?,
        )),
        #[cfg(feature = "object-storage")]
        StorageBackend::S3 => {
            let s3_config = config.s3.as_ref().ok_or_else(|| {
                StorageError::Backend("s3 backend requires a [storage.s3] section".into())
            })?;
            Ok(Arc::new(s3::S3ObjectStore::new(s3_config)?))
        }
        #[cfg(not(feature = "object-storage"))]
        StorageBackend::S3 => Err(StorageError::Backend(
            "S3 backend requires the `object-storage` feature".into(),
        )),
    }
}
