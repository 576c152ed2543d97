use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::features::links::handlers;
use crate::features::links::services::LinkService;

/// Public link routes
pub fn routes(service: Arc<LinkService>) -> Router {
    Router::new()
        .route("/api/links", get(handlers::list_links))
        .route("/api/links/{id}", get(handlers::get_link))
        .route("/api/links/{id}/tags", get(handlers::list_link_tags))
        .with_state(service)
}

/// Link management routes (admin)
pub fn admin_routes(service: Arc<LinkService>) -> Router {
    Router::new()
        .route(
            "/api/admin/links",
            get(handlers::list_all_links).post(handlers::create_link),
        )
        // Static segments must come before {id}
        .route("/api/admin/links/order", put(handlers::reorder_links))
        .route("/api/admin/links/move", post(handlers::move_link))
        .route(
            "/api/admin/links/{id}",
            put(handlers::update_link).delete(handlers::delete_link),
        )
        .route(
            "/api/admin/links/{id}/tags",
            put(handlers::sync_link_tags).post(handlers::add_link_tag),
        )
        .route(
            "/api/admin/links/{id}/tags/{tag_id}",
            delete(handlers::remove_link_tag),
        )
        .with_state(service)
}
