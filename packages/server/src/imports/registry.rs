use chrono::{Duration, Utc};
use common::ImportStatus;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::ImportError;
use crate::entity::import_operation;

/// Owns the lifecycle of import operations.
///
/// Every call is scoped to an owning namespace; an operation owned by another
/// namespace is reported exactly like a missing one.
#[derive(Clone)]
pub struct OperationRegistry {
    db: DatabaseConnection,
    ttl: Duration,
}

impl OperationRegistry {
    pub fn new(db: DatabaseConnection, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    /// Start a new operation in `pending` with a fixed expiration.
    pub async fn create(&self, owner: &str) -> Result<import_operation::Model, ImportError> {
        let now = Utc::now();
        let operation = import_operation::ActiveModel {
            id: Set(Uuid::new_v4()),
            account: Set(owner.to_string()),
            status: Set(ImportStatus::Pending),
            created_at: Set(now),
            expires_at: Set(now + self.ttl),
            last_updated: Set(now),
            ..Default::default()
        };

        let model = operation.insert(&self.db).await?;
        info!(operation_id = %model.id, account = owner, "Created import operation");
        Ok(model)
    }

    /// All operations owned by `owner`, oldest first.
    pub async fn list(&self, owner: &str) -> Result<Vec<import_operation::Model>, ImportError> {
        let operations = import_operation::Entity::find()
            .filter(import_operation::Column::Account.eq(owner))
            .order_by_asc(import_operation::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(operations)
    }

    pub async fn get(
        &self,
        owner: &str,
        operation_id: &str,
    ) -> Result<import_operation::Model, ImportError> {
        find_owned(&self.db, owner, operation_id, false).await
    }

    /// Move a live operation to `invalidated`.
    ///
    /// Idempotent: `complete` and `invalidated` operations are returned unchanged.
    pub async fn invalidate(
        &self,
        owner: &str,
        operation_id: &str,
    ) -> Result<import_operation::Model, ImportError> {
        let txn = self.db.begin().await?;
        let operation = find_owned(&txn, owner, operation_id, true).await?;

        if operation.status.is_terminal() {
            txn.rollback().await?;
            return Ok(operation);
        }

        let updated = set_status(&txn, operation, ImportStatus::Invalidated).await?;
        txn.commit().await?;

        info!(operation_id = %updated.id, account = owner, "Invalidated import operation");
        Ok(updated)
    }

    /// Apply a client-requested status change.
    ///
    /// Only `pending` and `active` operations change; for any other status the
    /// request is dropped and the current record returned.
    pub async fn update_status(
        &self,
        owner: &str,
        operation_id: &str,
        new_status: Option<ImportStatus>,
    ) -> Result<import_operation::Model, ImportError> {
        let Some(new_status) = new_status else {
            return Err(ImportError::bad_request("status field required"));
        };

        let txn = self.db.begin().await?;
        let operation = find_owned(&txn, owner, operation_id, true).await?;

        if !operation.status.is_mutable() || operation.status == new_status {
            txn.rollback().await?;
            return Ok(operation);
        }

        let previous = operation.status;
        let updated = set_status(&txn, operation, new_status).await?;
        txn.commit().await?;

        info!(
            operation_id = %updated.id,
            account = owner,
            from = %previous,
            to = %new_status,
            "Updated import operation status"
        );
        Ok(updated)
    }
}

/// Look up an operation by id within the owner's namespace.
///
/// Unparseable ids are reported as not found so callers cannot probe id formats.
pub(crate) async fn find_owned<C: ConnectionTrait>(
    conn: &C,
    owner: &str,
    operation_id: &str,
    for_update: bool,
) -> Result<import_operation::Model, ImportError> {
    let not_found = || ImportError::NotFound(operation_id.to_string());
    let id = Uuid::parse_str(operation_id).map_err(|_| not_found())?;

    let mut query = import_operation::Entity::find_by_id(id)
        .filter(import_operation::Column::Account.eq(owner));
    if for_update {
        query = query.lock(LockType::Update);
    }

    query.one(conn).await?.ok_or_else(not_found)
}

async fn set_status<C: ConnectionTrait>(
    conn: &C,
    operation: import_operation::Model,
    status: ImportStatus,
) -> Result<import_operation::Model, ImportError> {
    let mut active: import_operation::ActiveModel = operation.into();
    active.status = Set(status);
    active.last_updated = Set(Utc::now());
    Ok(active.update(conn).await?)
}
