use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::analytics::dtos::StatsSummaryDto;
use crate::features::analytics::services::StatsService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

/// Link, click and vote totals with top links and per-category numbers (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Stats summary", body = ApiResponse<StatsSummaryDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "analytics",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_stats(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<StatsService>>,
) -> Result<Json<ApiResponse<StatsSummaryDto>>> {
    let summary = service.summary().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
