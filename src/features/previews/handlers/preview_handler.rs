use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::previews::dtos::LinkPreviewResponseDto;
use crate::features::previews::services::PreviewService;
use crate::shared::types::ApiResponse;

/// Stored preview of a link
#[utoipa::path(
    get,
    path = "/api/links/{id}/preview",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Preview found", body = ApiResponse<LinkPreviewResponseDto>),
        (status = 404, description = "No preview stored")
    ),
    tag = "previews"
)]
pub async fn get_preview(
    State(service): State<Arc<PreviewService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LinkPreviewResponseDto>>> {
    let preview = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(preview.into()), None, None)))
}

/// Fetch and store a link's preview (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/links/{id}/preview",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Preview stored", body = ApiResponse<LinkPreviewResponseDto>),
        (status = 404, description = "Link not found"),
        (status = 502, description = "Target page could not be fetched")
    ),
    tag = "previews",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn refresh_preview(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<PreviewService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LinkPreviewResponseDto>>> {
    let preview = service.refresh(id).await?;
    Ok(Json(ApiResponse::success(
        Some(preview.into()),
        Some("Link preview fetched".to_string()),
        None,
    )))
}
