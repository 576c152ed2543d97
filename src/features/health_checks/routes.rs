use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::health_checks::handlers;
use crate::features::health_checks::services::HealthCheckService;

/// Public health status route
pub fn routes(service: Arc<HealthCheckService>) -> Router {
    Router::new()
        .route("/api/links/{id}/health", get(handlers::get_link_health))
        .with_state(service)
}

/// Admin routes that trigger checks
pub fn admin_routes(service: Arc<HealthCheckService>) -> Router {
    Router::new()
        .route(
            "/api/admin/links/{id}/health-check",
            post(handlers::check_link_health),
        )
        .route("/api/admin/health-checks", post(handlers::check_all_links))
        .with_state(service)
}
