use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Public category routes (no authentication required)
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
        .with_state(service)
}

/// Category management routes (auth middleware applied by caller, admin role checked per handler)
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/api/admin/categories", post(handlers::create_category))
        // Static segments must come before {id}
        .route(
            "/api/admin/categories/order",
            put(handlers::reorder_categories),
        )
        .route("/api/admin/categories/move", post(handlers::move_category))
        .route(
            "/api/admin/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .route(
            "/api/admin/categories/{id}/links",
            axum::routing::delete(handlers::clear_category_links),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::cache::CatalogCache;
    use crate::shared::test_helpers::with_viewer_auth;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::time::Duration;

    fn service() -> Arc<CategoryService> {
        Arc::new(CategoryService::new(
            lazy_test_pool(),
            Arc::new(CatalogCache::new(Duration::from_secs(30))),
        ))
    }

    #[tokio::test]
    async fn test_admin_routes_reject_anonymous() {
        let server = TestServer::new(admin_routes(service())).unwrap();
        let response = server
            .post("/api/admin/categories")
            .json(&serde_json::json!({ "name": "Tools" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_reject_non_admin() {
        let server = TestServer::new(with_viewer_auth(admin_routes(service()))).unwrap();
        let response = server
            .delete(&format!("/api/admin/categories/{}", uuid::Uuid::new_v4()))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }
}
