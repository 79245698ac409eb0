use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One uploaded payload recorded against an import operation.
///
/// `(operation_id, content_type, digest)` is unique; see `database::ensure_indexes`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image_import_content")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub operation_id: Uuid,
    #[sea_orm(belongs_to, from = "operation_id", to = "id")]
    pub operation: HasOne<super::import_operation::Entity>,

    /// Purposefully denormalized to avoid JOINs for ownership checks.
    pub account: String,

    /// Open tag, e.g. "packages", "manifest". Stored verbatim.
    pub content_type: String,

    /// Lowercase hex SHA-256 of the payload bytes.
    pub digest: String,

    pub storage_bucket: String,
    pub storage_key: String,

    /// Payload size in bytes.
    pub size: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
