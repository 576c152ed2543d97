use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::exports::handlers;
use crate::features::exports::services::ExportService;

pub fn admin_routes(service: Arc<ExportService>) -> Router {
    Router::new()
        .route("/api/admin/export/links.csv", get(handlers::export_links))
        .route(
            "/api/admin/export/analytics.csv",
            get(handlers::export_analytics),
        )
        .with_state(service)
}
