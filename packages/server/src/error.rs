use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::Value;

use crate::imports::ImportError;

/// Extra machine-readable context attached to an error.
pub type ErrorDetail = BTreeMap<String, Value>;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `BAD_REQUEST`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `PERMISSION_DENIED`, `NOT_FOUND`, `STORAGE_ERROR`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "BAD_REQUEST")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Request must contain content-length header")]
    pub message: String,
    /// Error-specific context, e.g. the rejected `content-length`.
    #[schema(value_type = Object)]
    pub detail: ErrorDetail,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
        detail: ErrorDetail,
    },
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    /// The resource does not exist or is not visible to the caller.
    NotFound {
        resource: String,
    },
    /// The object store or the record store refused a write.
    Storage(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            detail: ErrorDetail::new(),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::BadRequest { message, detail } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "BAD_REQUEST",
                    message,
                    detail,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                    detail: ErrorDetail::new(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                    detail: ErrorDetail::new(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                    detail: ErrorDetail::new(),
                },
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: "Resource not found".into(),
                    detail: ErrorDetail::from([("resource".to_string(), Value::String(resource))]),
                },
            ),
            AppError::Storage(detail) => {
                tracing::error!("Storage error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message: "Could not save content".into(),
                        detail: ErrorDetail::new(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                        detail: ErrorDetail::new(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::bad_request(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::NotFound(resource) => AppError::NotFound { resource },
            ImportError::BadRequest { message, detail } => AppError::BadRequest { message, detail },
            ImportError::Storage(detail) => AppError::Storage(detail),
            ImportError::Database(e) => AppError::from(e),
        }
    }
}
