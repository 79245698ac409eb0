use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/imports/images", import_routes())
}

fn import_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::imports::list_operations,
            handlers::imports::create_operation
        ))
        .routes(routes!(
            handlers::imports::get_operation,
            handlers::imports::update_operation,
            handlers::imports::invalidate_operation
        ))
        .routes(routes!(
            handlers::imports::list_content,
            handlers::imports::upload_content
        ))
}
