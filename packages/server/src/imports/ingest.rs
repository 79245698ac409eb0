use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::content_types;
use common::storage::{ObjectStore, sha256_hex, validate_segment};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ImportError, OperationRegistry};
use crate::entity::{import_content, import_operation};

/// Object store bucket holding all imported content.
pub const IMPORT_BUCKET: &str = "image_content_imports";

/// Deterministic object key for a piece of imported content.
pub fn content_key(account: &str, operation_id: Uuid, content_type: &str, digest: &str) -> String {
    format!("{account}/{operation_id}/{content_type}/{digest}")
}

/// Check a declared `Content-Length` against the upload ceiling.
///
/// A missing or zero length is rejected the same way: an upload must announce
/// its size before any byte is read.
pub fn validate_declared_length(declared: Option<u64>, max: u64) -> Result<u64, ImportError> {
    match declared {
        None | Some(0) => Err(ImportError::bad_request(
            "Request must contain content-length header",
        )),
        Some(length) if length > max => Err(ImportError::bad_request(format!(
            "too large. Max size of {max} bytes supported for content"
        ))
        .with_detail("content-length", length)),
        Some(length) => Ok(length),
    }
}

/// An upload that passed every check that can run before the body is read.
#[derive(Debug)]
pub struct ValidatedUpload {
    pub operation: import_operation::Model,
    pub content_type: String,
    pub declared_length: u64,
}

/// Outcome of an ingestion. Identical uploads resolve to the first record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedContent {
    pub digest: String,
    pub created_at: DateTime<Utc>,
}

impl From<import_content::Model> for IngestedContent {
    fn from(record: import_content::Model) -> Self {
        Self {
            digest: record.digest,
            created_at: record.created_at,
        }
    }
}

/// Content-addressed upload path for import operations.
#[derive(Clone)]
pub struct ContentIngestor {
    db: DatabaseConnection,
    store: Arc<dyn ObjectStore>,
    registry: OperationRegistry,
    max_upload_size: u64,
}

impl ContentIngestor {
    pub fn new(
        db: DatabaseConnection,
        store: Arc<dyn ObjectStore>,
        registry: OperationRegistry,
        max_upload_size: u64,
    ) -> Self {
        Self {
            db,
            store,
            registry,
            max_upload_size,
        }
    }

    /// Run every check that does not need the payload.
    ///
    /// Order matters: ownership first, so a foreign operation is a 404 whatever
    /// the request looks like.
    pub async fn prepare(
        &self,
        owner: &str,
        operation_id: &str,
        content_type: &str,
        declared_length: Option<u64>,
    ) -> Result<ValidatedUpload, ImportError> {
        let operation = self.registry.get(owner, operation_id).await?;
        let declared_length = validate_declared_length(declared_length, self.max_upload_size)?;

        if !operation.accepts_content(Utc::now()) {
            return Err(
                ImportError::bad_request("Import operation is not accepting content")
                    .with_detail("status", operation.status.as_str())
                    .with_detail("expires_at", operation.expires_at.to_rfc3339()),
            );
        }

        validate_segment(content_type).map_err(|e| {
            ImportError::bad_request(format!("Invalid content type '{content_type}': {e}"))
        })?;
        if !content_types::is_known(content_type) {
            debug!(content_type, "Accepting unrecognized content type");
        }

        Ok(ValidatedUpload {
            operation,
            content_type: content_type.to_string(),
            declared_length,
        })
    }

    /// Store the payload for a validated upload.
    ///
    /// The metadata row is inserted inside a transaction that only commits after
    /// the object store confirms the write. The unique index on
    /// `(operation_id, content_type, digest)` makes a concurrent identical upload
    /// wait on that row, then fail and fall back to reading it.
    pub async fn ingest(
        &self,
        upload: ValidatedUpload,
        payload: &[u8],
    ) -> Result<IngestedContent, ImportError> {
        let received = payload.len() as u64;
        if received != upload.declared_length {
            return Err(
                ImportError::bad_request("Body length does not match content-length header")
                    .with_detail("content-length", upload.declared_length)
                    .with_detail("received", received),
            );
        }

        let operation = &upload.operation;
        let content_type = upload.content_type.as_str();
        let digest = sha256_hex(payload);

        if let Some(existing) = find_content(&self.db, operation.id, content_type, &digest).await? {
            info!(
                operation_id = %operation.id,
                content_type,
                digest = %existing.digest,
                "Found existing content record"
            );
            return Ok(existing.into());
        }

        let key = content_key(&operation.account, operation.id, content_type, &digest);
        let record = import_content::ActiveModel {
            operation_id: Set(operation.id),
            account: Set(operation.account.clone()),
            content_type: Set(content_type.to_string()),
            digest: Set(digest.clone()),
            storage_bucket: Set(IMPORT_BUCKET.to_string()),
            storage_key: Set(key.clone()),
            size: Set(i64::try_from(received).unwrap_or(i64::MAX)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let inserted = match record.insert(&txn).await {
            Ok(inserted) => inserted,
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                txn.rollback().await?;
                debug!(operation_id = %operation.id, content_type, %digest, "Lost concurrent upload race");
                let existing = find_content(&self.db, operation.id, content_type, &digest)
                    .await?
                    .ok_or_else(|| {
                        DbErr::Custom(
                            "UniqueConstraintViolation but existing row not found".to_string(),
                        )
                    })?;
                return Ok(existing.into());
            }
            Err(e) => return Err(e.into()),
        };

        match self
            .store
            .put(&operation.account, IMPORT_BUCKET, &key, payload)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                rollback_after_failure(txn).await;
                warn!(%key, backend = self.store.backend_name(), "Object store refused write");
                return Err(ImportError::Storage(format!(
                    "Could not save {key} into object store"
                )));
            }
            Err(e) => {
                rollback_after_failure(txn).await;
                return Err(e.into());
            }
        }

        txn.commit().await?;

        info!(
            operation_id = %operation.id,
            content_type,
            digest = %inserted.digest,
            size = inserted.size,
            "Stored import content"
        );

        Ok(inserted.into())
    }

    /// Validate and store in one call.
    pub async fn upload(
        &self,
        owner: &str,
        operation_id: &str,
        content_type: &str,
        payload: &[u8],
        declared_length: Option<u64>,
    ) -> Result<IngestedContent, ImportError> {
        let upload = self
            .prepare(owner, operation_id, content_type, declared_length)
            .await?;
        self.ingest(upload, payload).await
    }

    /// Digests of every `content_type` payload recorded for an operation, oldest first.
    ///
    /// An unknown or foreign operation simply has no content.
    pub async fn list_digests(
        &self,
        owner: &str,
        operation_id: &str,
        content_type: &str,
    ) -> Result<Vec<String>, ImportError> {
        let Ok(operation_id) = Uuid::parse_str(operation_id) else {
            return Ok(Vec::new());
        };

        let records = import_content::Entity::find()
            .filter(import_content::Column::Account.eq(owner))
            .filter(import_content::Column::OperationId.eq(operation_id))
            .filter(import_content::Column::ContentType.eq(content_type))
            .order_by_asc(import_content::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(records.into_iter().map(|r| r.digest).collect())
    }
}

/// Roll back after the object store failed. A rollback error is only logged so
/// the caller still sees the storage failure.
async fn rollback_after_failure(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        warn!(error = %e, "Failed to roll back content record after storage failure");
    }
}

async fn find_content<C: ConnectionTrait>(
    conn: &C,
    operation_id: Uuid,
    content_type: &str,
    digest: &str,
) -> Result<Option<import_content::Model>, DbErr> {
    import_content::Entity::find()
        .filter(import_content::Column::OperationId.eq(operation_id))
        .filter(import_content::Column::ContentType.eq(content_type))
        .filter(import_content::Column::Digest.eq(digest))
        .one(conn)
        .await
}
