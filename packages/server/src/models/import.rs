use chrono::{DateTime, Utc};
use common::ImportStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::import_operation;
use crate::imports::IngestedContent;

/// An import operation as seen by clients.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OperationResponse {
    #[schema(example = "0b5c3a86-61d4-4a1e-9d47-5f2f3bcbde01")]
    pub uuid: Uuid,
    #[schema(example = "pending")]
    pub status: ImportStatus,
    #[schema(example = "2025-09-01T08:00:00Z")]
    pub created_at: DateTime<Utc>,
    /// Fixed at creation; content is refused after this instant.
    #[schema(example = "2025-09-02T08:00:00Z")]
    pub expires_at: DateTime<Utc>,
    #[schema(example = "2025-09-01T08:00:00Z")]
    pub last_updated: DateTime<Utc>,
}

impl From<import_operation::Model> for OperationResponse {
    fn from(m: import_operation::Model) -> Self {
        Self {
            uuid: m.id,
            status: m.status,
            created_at: m.created_at,
            expires_at: m.expires_at,
            last_updated: m.last_updated,
        }
    }
}

/// Request body for changing an operation's status.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateOperationRequest {
    /// Target status. Ignored when the operation is no longer pending or active.
    #[schema(example = "complete")]
    pub status: Option<ImportStatus>,
}

/// Result of a content upload. Identical re-uploads return the original record.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ContentUploadResponse {
    /// Lowercase hex SHA-256 of the uploaded bytes.
    #[schema(example = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")]
    pub digest: String,
    #[schema(example = "2025-09-01T08:05:00Z")]
    pub created_at: DateTime<Utc>,
}

impl From<IngestedContent> for ContentUploadResponse {
    fn from(c: IngestedContent) -> Self {
        Self {
            digest: c.digest,
            created_at: c.created_at,
        }
    }
}
