use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::health_checks::dtos::{BulkHealthCheckResponseDto, HealthCheckResponseDto};
use crate::features::health_checks::services::HealthCheckService;
use crate::shared::types::ApiResponse;

/// Latest health check of a link (`data` is null if never checked)
#[utoipa::path(
    get,
    path = "/api/links/{id}/health",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Latest check", body = ApiResponse<HealthCheckResponseDto>),
        (status = 404, description = "Link not found")
    ),
    tag = "health-checks"
)]
pub async fn get_link_health(
    State(service): State<Arc<HealthCheckService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HealthCheckResponseDto>>> {
    let latest = service.latest(id).await?;
    Ok(Json(ApiResponse::success(
        latest.map(HealthCheckResponseDto::from),
        None,
        None,
    )))
}

/// Check one link now (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/links/{id}/health-check",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Check recorded", body = ApiResponse<HealthCheckResponseDto>),
        (status = 404, description = "Link not found")
    ),
    tag = "health-checks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_link_health(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<HealthCheckService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<HealthCheckResponseDto>>> {
    let check = service.check_link(id).await?;
    Ok(Json(ApiResponse::success(Some(check.into()), None, None)))
}

/// Check every active link (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/health-checks",
    responses(
        (status = 200, description = "Summary of the sweep", body = ApiResponse<BulkHealthCheckResponseDto>),
    ),
    tag = "health-checks",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check_all_links(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<HealthCheckService>>,
) -> Result<Json<ApiResponse<BulkHealthCheckResponseDto>>> {
    let summary = service.check_all_active().await?;
    Ok(Json(ApiResponse::success(Some(summary), None, None)))
}
