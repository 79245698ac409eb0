use axum::{
    Json,
    body::{Body, to_bytes},
    extract::{Path, State},
    http::{HeaderMap, header},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::Caller;
use crate::extractors::json::AppJson;
use crate::models::import::*;
use crate::state::AppState;

/// Start a new import operation.
#[utoipa::path(
    post,
    path = "",
    tag = "Imports",
    operation_id = "createImportOperation",
    summary = "Create import operation",
    description = "Creates a `pending` operation in the caller's namespace. It accepts content until `expires_at`. Requires an admin or service account.",
    responses(
        (status = 200, description = "Operation created", body = OperationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller), fields(account = %caller.namespace))]
pub async fn create_operation(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<OperationResponse>, AppError> {
    caller.require_internal_service()?;

    let operation = state.registry.create(&caller.namespace).await?;
    Ok(Json(operation.into()))
}

/// List the caller's import operations.
#[utoipa::path(
    get,
    path = "",
    tag = "Imports",
    operation_id = "listImportOperations",
    summary = "List import operations",
    description = "Returns every operation in the caller's namespace, oldest first.",
    responses(
        (status = 200, description = "Operations", body = Vec<OperationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller), fields(account = %caller.namespace))]
pub async fn list_operations(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<Vec<OperationResponse>>, AppError> {
    caller.require_internal_service()?;

    let operations = state.registry.list(&caller.namespace).await?;
    Ok(Json(operations.into_iter().map(Into::into).collect()))
}

/// Get a single import operation.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Imports",
    operation_id = "getImportOperation",
    summary = "Get import operation",
    params(("id" = String, Path, description = "Operation UUID")),
    responses(
        (status = 200, description = "Operation", body = OperationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Operation not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller), fields(account = %caller.namespace))]
pub async fn get_operation(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OperationResponse>, AppError> {
    caller.require_internal_service()?;

    let operation = state.registry.get(&caller.namespace, &id).await?;
    Ok(Json(operation.into()))
}

/// Change an operation's status.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Imports",
    operation_id = "updateImportOperation",
    summary = "Update import operation status",
    description = "Applies the requested status while the operation is `pending` or `active`. Otherwise the request is ignored and the current operation returned.",
    params(("id" = String, Path, description = "Operation UUID")),
    request_body = UpdateOperationRequest,
    responses(
        (status = 200, description = "Operation after the update", body = OperationResponse),
        (status = 400, description = "Missing or unknown status (BAD_REQUEST)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Operation not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller, payload), fields(account = %caller.namespace))]
pub async fn update_operation(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateOperationRequest>,
) -> Result<Json<OperationResponse>, AppError> {
    caller.require_internal_service()?;

    let operation = state
        .registry
        .update_status(&caller.namespace, &id, payload.status)
        .await?;
    Ok(Json(operation.into()))
}

/// Invalidate an operation.
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Imports",
    operation_id = "invalidateImportOperation",
    summary = "Invalidate import operation",
    description = "Moves a live operation to `invalidated`. Completed and already invalidated operations are returned unchanged.",
    params(("id" = String, Path, description = "Operation UUID")),
    responses(
        (status = 200, description = "Operation after invalidation", body = OperationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Operation not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller), fields(account = %caller.namespace))]
pub async fn invalidate_operation(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OperationResponse>, AppError> {
    caller.require_internal_service()?;

    let operation = state.registry.invalidate(&caller.namespace, &id).await?;
    Ok(Json(operation.into()))
}

/// List digests uploaded for one content type.
#[utoipa::path(
    get,
    path = "/{id}/{content_type}",
    tag = "Imports",
    operation_id = "listImportContent",
    summary = "List uploaded content",
    description = "Returns the digests recorded for `content_type` (e.g. `packages`), oldest first. Unknown operations have no content.",
    params(
        ("id" = String, Path, description = "Operation UUID"),
        ("content_type" = String, Path, description = "Content type tag, e.g. `packages`"),
    ),
    responses(
        (status = 200, description = "Digests", body = Vec<String>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller), fields(account = %caller.namespace))]
pub async fn list_content(
    caller: Caller,
    State(state): State<AppState>,
    Path((id, content_type)): Path<(String, String)>,
) -> Result<Json<Vec<String>>, AppError> {
    caller.require_internal_service()?;

    let digests = state
        .ingestor
        .list_digests(&caller.namespace, &id, &content_type)
        .await?;
    Ok(Json(digests))
}

/// Upload one piece of content.
#[utoipa::path(
    post,
    path = "/{id}/{content_type}",
    tag = "Imports",
    operation_id = "uploadImportContent",
    summary = "Upload content",
    description = "Stores the raw request body under its SHA-256 digest. A `Content-Length` header is required and bounded by the configured maximum. Uploading identical bytes again returns the original record.",
    params(
        ("id" = String, Path, description = "Operation UUID"),
        ("content_type" = String, Path, description = "Content type tag, e.g. `packages`"),
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Content stored or already present", body = ContentUploadResponse),
        (status = 400, description = "Missing or oversized content-length, or operation closed (BAD_REQUEST)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Operation not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Object store write failed (STORAGE_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, caller, headers, body), fields(account = %caller.namespace))]
pub async fn upload_content(
    caller: Caller,
    State(state): State<AppState>,
    Path((id, content_type)): Path<(String, String)>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<ContentUploadResponse>, AppError> {
    caller.require_internal_service()?;

    let declared_length = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    // Nothing is read from the body until the declared length has been checked.
    let upload = state
        .ingestor
        .prepare(&caller.namespace, &id, &content_type, declared_length)
        .await?;

    let limit = usize::try_from(upload.declared_length).unwrap_or(usize::MAX);
    let payload = to_bytes(body, limit)
        .await
        .map_err(|e| AppError::bad_request(format!("Failed to read request body: {e}")))?;

    let content = state.ingestor.ingest(upload, &payload).await?;
    Ok(Json(content.into()))
}
