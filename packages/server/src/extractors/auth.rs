use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use common::storage::validate_segment;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{self, AccountType};

/// Header an internal-service caller uses to act on behalf of another namespace.
pub const ACCOUNT_HEADER: &str = "X-Account";

/// Account types allowed to drive import operations.
pub const INTERNAL_SERVICE_ALLOWED: [AccountType; 2] = [AccountType::Admin, AccountType::Service];

/// Authenticated caller extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
/// Account type checks happen via `require_internal_service()` in the handler body.
#[derive(Debug, Clone)]
pub struct Caller {
    pub principal: String,
    pub account_type: AccountType,
    /// Namespace every lookup is scoped to.
    pub namespace: String,
}

impl Caller {
    /// Returns `Ok(())` for admin and service accounts, `Err(PermissionDenied)` otherwise.
    pub fn require_internal_service(&self) -> Result<(), AppError> {
        if INTERNAL_SERVICE_ALLOWED.contains(&self.account_type) {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

/// Pick the namespace a caller acts as.
///
/// Only internal-service accounts may switch namespace; everyone else acts as
/// themselves regardless of the header. The namespace becomes the first segment
/// of every object path, so it must be a valid storage segment.
fn resolve_namespace(
    principal: &str,
    account_type: AccountType,
    headers: &HeaderMap,
) -> Result<String, AppError> {
    if !INTERNAL_SERVICE_ALLOWED.contains(&account_type) {
        return Ok(principal.to_string());
    }

    let requested = match headers.get(ACCOUNT_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::bad_request("Invalid X-Account header"))?
            .trim(),
        None => "",
    };
    let namespace = if requested.is_empty() {
        principal
    } else {
        requested
    };

    validate_segment(namespace)
        .map_err(|e| AppError::bad_request(format!("Invalid account '{namespace}': {e}")))?;
    Ok(namespace.to_string())
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token, &state.config.auth.jwt_secret)
            .map_err(|_| AppError::TokenInvalid)?;

        let namespace = resolve_namespace(&claims.sub, claims.account_type, &parts.headers)?;

        Ok(Caller {
            principal: claims.sub,
            account_type: claims.account_type,
            namespace,
        })
    }
}
