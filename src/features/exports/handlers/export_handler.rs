use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;

use crate::core::error::Result;
use crate::features::analytics::dtos::AnalyticsQueryParams;
use crate::features::auth::guards::RequireAdmin;
use crate::features::exports::services::ExportService;

fn csv_attachment(prefix: &str, body: String) -> impl IntoResponse {
    let filename = format!("{}_{}.csv", prefix, Utc::now().format("%Y%m%d_%H%M%S"));
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
}

/// Download every link as CSV (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/export/links.csv",
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "exports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_links(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ExportService>>,
) -> Result<impl IntoResponse> {
    let body = service.links_csv().await?;
    Ok(csv_attachment("links", body))
}

/// Download click records as CSV (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/export/analytics.csv",
    params(AnalyticsQueryParams),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "exports",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_analytics(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<ExportService>>,
    Query(params): Query<AnalyticsQueryParams>,
) -> Result<impl IntoResponse> {
    let body = service.analytics_csv(&params).await?;
    Ok(csv_attachment("analytics", body))
}
