use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::analytics::handlers;
use crate::features::analytics::services::{AnalyticsService, StatsService};

pub fn routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/api/links/{id}/click", post(handlers::track_click))
        .with_state(service)
}

pub fn admin_routes(service: Arc<AnalyticsService>, stats: Arc<StatsService>) -> Router {
    let analytics = Router::new()
        .route("/api/admin/analytics", get(handlers::list_analytics))
        .route(
            "/api/admin/analytics/sessions",
            get(handlers::list_sessions),
        )
        .with_state(service);

    let stats = Router::new()
        .route("/api/admin/stats", get(handlers::get_stats))
        .with_state(stats);

    analytics.merge(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::lazy_test_pool;
    use crate::shared::test_helpers::{with_admin_auth, with_viewer_auth};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn router() -> Router {
        let pool = lazy_test_pool();
        admin_routes(
            Arc::new(AnalyticsService::new(pool.clone(), false)),
            Arc::new(StatsService::new(pool)),
        )
    }

    #[tokio::test]
    async fn test_stats_reject_anonymous() {
        let server = TestServer::new(router()).unwrap();
        let response = server.get("/api/admin/stats").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_analytics_reject_non_admin() {
        let server = TestServer::new(with_viewer_auth(router())).unwrap();
        let response = server.get("/api/admin/analytics").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_sessions_reject_reversed_window() {
        let server = TestServer::new(with_admin_auth(router())).unwrap();
        let response = server
            .get("/api/admin/analytics/sessions")
            .add_query_param("from", "2026-02-01T00:00:00Z")
            .add_query_param("to", "2026-01-01T00:00:00Z")
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }
}
