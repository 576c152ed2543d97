use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::tags::handlers;
use crate::features::tags::services::TagService;

/// Public tag routes
pub fn routes(service: Arc<TagService>) -> Router {
    Router::new()
        .route("/api/tags", get(handlers::list_tags))
        .route("/api/tags/{slug}", get(handlers::get_tag))
        .with_state(service)
}

/// Tag management routes (admin)
pub fn admin_routes(service: Arc<TagService>) -> Router {
    Router::new()
        .route("/api/admin/tags", post(handlers::create_tag))
        .route("/api/admin/tags/resolve", post(handlers::resolve_tags))
        .route(
            "/api/admin/tags/{id}",
            put(handlers::update_tag).delete(handlers::delete_tag),
        )
        .with_state(service)
}
