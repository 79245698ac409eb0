use common::ImportStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "image_import_operation")]
pub struct Model {
    /// UUIDv4 handed to the client.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Owning namespace. Every lookup filters on it.
    pub account: String,

    pub status: ImportStatus,

    #[sea_orm(has_many)]
    pub contents: HasMany<super::import_content::Entity>,

    pub created_at: DateTimeUtc,
    /// Fixed at creation, never renewed.
    pub expires_at: DateTimeUtc,
    pub last_updated: DateTimeUtc,
}

impl Model {
    /// Returns true once the upload window has closed.
    pub fn is_expired(&self, now: DateTimeUtc) -> bool {
        now >= self.expires_at
    }

    /// Returns true if content uploads are still allowed.
    pub fn accepts_content(&self, now: DateTimeUtc) -> bool {
        self.status.is_mutable() && !self.is_expired(now)
    }
}

impl ActiveModelBehavior for ActiveModel {}
