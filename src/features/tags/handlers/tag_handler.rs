use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::tags::dtos::{CreateTagDto, ResolveTagsDto, TagResponseDto, UpdateTagDto};
use crate::features::tags::services::TagService;
use crate::shared::types::{ApiResponse, Meta};

/// List all tags, most used first
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "List of tags", body = ApiResponse<Vec<TagResponseDto>>),
    ),
    tag = "tags"
)]
pub async fn list_tags(
    State(service): State<Arc<TagService>>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>> {
    let tags: Vec<TagResponseDto> = service
        .list()
        .await?
        .into_iter()
        .map(TagResponseDto::from)
        .collect();
    let total = tags.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(tags),
        None,
        Some(Meta { total }),
    )))
}

/// Get tag by slug
#[utoipa::path(
    get,
    path = "/api/tags/{slug}",
    params(
        ("slug" = String, Path, description = "Tag slug")
    ),
    responses(
        (status = 200, description = "Tag found", body = ApiResponse<TagResponseDto>),
        (status = 404, description = "Tag not found")
    ),
    tag = "tags"
)]
pub async fn get_tag(
    State(service): State<Arc<TagService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<TagResponseDto>>> {
    let tag = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(tag.into()), None, None)))
}

/// Create a tag (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/tags",
    request_body = CreateTagDto,
    responses(
        (status = 200, description = "Tag created", body = ApiResponse<TagResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "tags",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_tag(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    AppJson(dto): AppJson<CreateTagDto>,
) -> Result<Json<ApiResponse<TagResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tag = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(tag.into()), None, None)))
}

/// Update a tag (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/tags/{id}",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    request_body = UpdateTagDto,
    responses(
        (status = 200, description = "Tag updated", body = ApiResponse<TagResponseDto>),
        (status = 404, description = "Tag not found"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "tags",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_tag(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTagDto>,
) -> Result<Json<ApiResponse<TagResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tag = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(tag.into()), None, None)))
}

/// Delete a tag (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/tags/{id}",
    params(
        ("id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag deleted"),
        (status = 404, description = "Tag not found")
    ),
    tag = "tags",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_tag(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Tag deleted".to_string()),
        None,
    )))
}

/// Resolve tag names to tags, creating missing ones (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/tags/resolve",
    request_body = ResolveTagsDto,
    responses(
        (status = 200, description = "Resolved tags in request order", body = ApiResponse<Vec<TagResponseDto>>),
        (status = 400, description = "Validation error")
    ),
    tag = "tags",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn resolve_tags(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<TagService>>,
    AppJson(dto): AppJson<ResolveTagsDto>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tags: Vec<TagResponseDto> = service
        .resolve_names(&dto.names)
        .await?
        .into_iter()
        .map(TagResponseDto::from)
        .collect();
    Ok(Json(ApiResponse::success(Some(tags), None, None)))
}
