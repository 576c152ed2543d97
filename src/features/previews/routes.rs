use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::previews::handlers;
use crate::features::previews::services::PreviewService;

pub fn routes(service: Arc<PreviewService>) -> Router {
    Router::new()
        .route("/api/links/{id}/preview", get(handlers::get_preview))
        .with_state(service)
}

pub fn admin_routes(service: Arc<PreviewService>) -> Router {
    Router::new()
        .route(
            "/api/admin/links/{id}/preview",
            post(handlers::refresh_preview),
        )
        .with_state(service)
}
