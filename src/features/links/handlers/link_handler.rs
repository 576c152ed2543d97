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
use crate::features::links::dtos::{
    AddLinkTagDto, CreateLinkDto, LinkResponseDto, MoveLinkDto, SyncLinkTagsDto, UpdateLinkDto,
};
use crate::features::links::models::LinkWithCategory;
use crate::features::links::services::LinkService;
use crate::features::tags::dtos::TagResponseDto;
use crate::features::tags::models::Tag;
use crate::shared::reorder::{OrderItemDto, ReorderDto};
use crate::shared::types::{ApiResponse, Meta};

fn to_response(links: Vec<LinkWithCategory>) -> ApiResponse<Vec<LinkResponseDto>> {
    let total = links.len() as i64;
    let data = links.into_iter().map(LinkResponseDto::from).collect();
    ApiResponse::success(Some(data), None, Some(Meta { total }))
}

fn tags_response(tags: Vec<Tag>) -> ApiResponse<Vec<TagResponseDto>> {
    let data = tags.into_iter().map(TagResponseDto::from).collect();
    ApiResponse::success(Some(data), None, None)
}

/// List visible links, pinned first then by position
#[utoipa::path(
    get,
    path = "/api/links",
    responses(
        (status = 200, description = "Visible links", body = ApiResponse<Vec<LinkResponseDto>>),
    ),
    tag = "links"
)]
pub async fn list_links(
    State(service): State<Arc<LinkService>>,
) -> Result<Json<ApiResponse<Vec<LinkResponseDto>>>> {
    let links = service.list_visible().await?;
    Ok(Json(to_response(links)))
}

/// Get a visible link by id
#[utoipa::path(
    get,
    path = "/api/links/{id}",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Link found", body = ApiResponse<LinkResponseDto>),
        (status = 404, description = "Link not found or not visible")
    ),
    tag = "links"
)]
pub async fn get_link(
    State(service): State<Arc<LinkService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LinkResponseDto>>> {
    let link = service.get_visible(id).await?;
    Ok(Json(ApiResponse::success(Some(link.into()), None, None)))
}

/// Tags attached to a visible link
#[utoipa::path(
    get,
    path = "/api/links/{id}/tags",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Tags of the link", body = ApiResponse<Vec<TagResponseDto>>),
        (status = 404, description = "Link not found or not visible")
    ),
    tag = "links"
)]
pub async fn list_link_tags(
    State(service): State<Arc<LinkService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>> {
    let tags = service.visible_link_tags(id).await?;
    Ok(Json(tags_response(tags)))
}

/// List every link including hidden ones (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/links",
    responses(
        (status = 200, description = "All links", body = ApiResponse<Vec<LinkResponseDto>>),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_all_links(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
) -> Result<Json<ApiResponse<Vec<LinkResponseDto>>>> {
    let links = service.list_all().await?;
    Ok(Json(to_response(links)))
}

/// Create a link (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/links",
    request_body = CreateLinkDto,
    responses(
        (status = 200, description = "Link created", body = ApiResponse<LinkResponseDto>),
        (status = 400, description = "Validation error or unknown category")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_link(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    AppJson(dto): AppJson<CreateLinkDto>,
) -> Result<Json<ApiResponse<LinkResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let link = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(link.into()), None, None)))
}

/// Update a link (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/links/{id}",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    request_body = UpdateLinkDto,
    responses(
        (status = 200, description = "Link updated", body = ApiResponse<LinkResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Link not found")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_link(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateLinkDto>,
) -> Result<Json<ApiResponse<LinkResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let link = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(link.into()), None, None)))
}

/// Delete a link (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/links/{id}",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Link deleted"),
        (status = 404, description = "Link not found")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_link(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Link deleted".to_string()),
        None,
    )))
}

/// Persist explicit link positions (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/links/order",
    request_body = ReorderDto,
    responses(
        (status = 200, description = "Order saved"),
        (status = 400, description = "Unknown ids or invalid positions")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reorder_links(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    AppJson(dto): AppJson<ReorderDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let positions = dto.into_positions()?;
    service.reorder(&positions).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Link order saved".to_string()),
        None,
    )))
}

/// Drag-and-drop move of one link onto another's slot (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/links/move",
    request_body = MoveLinkDto,
    responses(
        (status = 200, description = "New positions for the affected group", body = ApiResponse<Vec<OrderItemDto>>),
        (status = 400, description = "Links are not in the same group"),
        (status = 404, description = "Link not found")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn move_link(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    AppJson(dto): AppJson<MoveLinkDto>,
) -> Result<Json<ApiResponse<Vec<OrderItemDto>>>> {
    let positions = service.move_link(&dto).await?;
    let items = positions
        .into_iter()
        .map(|(id, order_position)| OrderItemDto { id, order_position })
        .collect();
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}

/// Replace a link's tags with exactly the given set (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/links/{id}/tags",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    request_body = SyncLinkTagsDto,
    responses(
        (status = 200, description = "Tags after sync", body = ApiResponse<Vec<TagResponseDto>>),
        (status = 400, description = "Unknown tag id"),
        (status = 404, description = "Link not found")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn sync_link_tags(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<SyncLinkTagsDto>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tags = service.sync_tags(id, &dto.tag_ids).await?;
    Ok(Json(tags_response(tags)))
}

/// Attach one tag to a link (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/links/{id}/tags",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    request_body = AddLinkTagDto,
    responses(
        (status = 200, description = "Tags after adding", body = ApiResponse<Vec<TagResponseDto>>),
        (status = 404, description = "Link or tag not found")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_link_tag(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AddLinkTagDto>,
) -> Result<Json<ApiResponse<Vec<TagResponseDto>>>> {
    let tags = service.add_tag(id, dto.tag_id).await?;
    Ok(Json(tags_response(tags)))
}

/// Detach a tag from a link (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/links/{id}/tags/{tag_id}",
    params(
        ("id" = Uuid, Path, description = "Link ID"),
        ("tag_id" = Uuid, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag removed"),
        (status = 404, description = "Tag not attached to the link")
    ),
    tag = "links",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_link_tag(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<LinkService>>,
    Path((id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove_tag(id, tag_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Tag removed from link".to_string()),
        None,
    )))
}
