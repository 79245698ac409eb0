#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an image import operation.
///
/// `pending -> active -> complete` is the normal path. `pending` and `active`
/// operations can be invalidated or expire. `complete` and `invalidated` are
/// terminal.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    /// Created, no content accepted yet (or the client has not flipped it).
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "pending"))]
    Pending,
    /// Client is uploading content.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "active"))]
    Active,
    /// All content uploaded; ready for finalization.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "complete"))]
    Complete,
    /// Cancelled by the client or an administrator.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "invalidated"))]
    Invalidated,
    /// The upload window closed before completion.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "expired"))]
    Expired,
}

impl ImportStatus {
    /// Returns true if the operation still accepts status changes and content.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Returns true if no transition may leave this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Invalidated)
    }

    /// Returns the string representation (lowercase).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Complete => "complete",
            Self::Invalidated => "invalidated",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
