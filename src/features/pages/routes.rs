use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::pages::handlers;
use crate::features::pages::services::PageService;

pub fn routes(service: Arc<PageService>) -> Router {
    Router::new()
        .route("/api/home", get(handlers::get_home))
        .route(
            "/api/categories/{slug}/links",
            get(handlers::get_category_page),
        )
        .route("/api/tags/{slug}/links", get(handlers::get_tag_page))
        .with_state(service)
}
