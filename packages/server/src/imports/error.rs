use common::storage::StorageError;
use sea_orm::DbErr;
use serde_json::Value;

use crate::error::ErrorDetail;

/// Failures raised by the operation registry and the content ingestor.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// No operation with this id is visible to the caller.
    #[error("import operation {0} not found")]
    NotFound(String),
    #[error("{message}")]
    BadRequest {
        message: String,
        detail: ErrorDetail,
    },
    /// The object store refused or failed the write.
    #[error("storage failure: {0}")]
    Storage(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl ImportError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ImportError::BadRequest {
            message: message.into(),
            detail: ErrorDetail::new(),
        }
    }

    /// Attach a detail entry. No-op for variants without a detail map.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        if let ImportError::BadRequest { detail, .. } = &mut self {
            detail.insert(key.to_string(), value.into());
        }
        self
    }
}

impl From<StorageError> for ImportError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => {
                ImportError::bad_request(format!("Invalid storage location: {msg}"))
            }
            other => ImportError::Storage(other.to_string()),
        }
    }
}
