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
use crate::features::categories::dtos::{
    CategoryResponseDto, ClearCategoryResponseDto, CreateCategoryDto, MoveCategoryDto,
    UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::reorder::{OrderItemDto, ReorderDto};
use crate::shared::types::{ApiResponse, Meta};

/// List all categories in display order
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryResponseDto>>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<ApiResponse<Vec<CategoryResponseDto>>>> {
    let categories: Vec<CategoryResponseDto> = service
        .list()
        .await?
        .into_iter()
        .map(CategoryResponseDto::from)
        .collect();
    let total = categories.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(categories),
        None,
        Some(Meta { total }),
    )))
}

/// Get category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category.into()), None, None)))
}

/// Create a category (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 200, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - admin only"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.create(dto).await?;
    Ok(Json(ApiResponse::success(Some(category.into()), None, None)))
}

/// Update a category (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug conflict or locked time-based slug")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    dto.validate_clearable().map_err(AppError::Validation)?;

    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(Some(category.into()), None, None)))
}

/// Delete a category (admin only). Links in it become uncategorized.
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category deleted".to_string()),
        None,
    )))
}

/// Delete every link in a category (admin only)
#[utoipa::path(
    delete,
    path = "/api/admin/categories/{id}/links",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Links removed", body = ApiResponse<ClearCategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn clear_category_links(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClearCategoryResponseDto>>> {
    let deleted_links = service.clear_links(id).await?;
    Ok(Json(ApiResponse::success(
        Some(ClearCategoryResponseDto {
            category_id: id,
            deleted_links,
        }),
        None,
        None,
    )))
}

/// Persist explicit category positions (admin only)
#[utoipa::path(
    put,
    path = "/api/admin/categories/order",
    request_body = ReorderDto,
    responses(
        (status = 200, description = "Order saved"),
        (status = 400, description = "Unknown ids or invalid positions")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reorder_categories(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<ReorderDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let positions = dto.into_positions()?;
    service.reorder(&positions).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Category order saved".to_string()),
        None,
    )))
}

/// Drag-and-drop move of one category onto another's slot (admin only)
#[utoipa::path(
    post,
    path = "/api/admin/categories/move",
    request_body = MoveCategoryDto,
    responses(
        (status = 200, description = "New positions for every category", body = ApiResponse<Vec<OrderItemDto>>),
        (status = 400, description = "Unknown category id")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn move_category(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<MoveCategoryDto>,
) -> Result<Json<ApiResponse<Vec<OrderItemDto>>>> {
    let positions = service.move_category(dto.active_id, dto.over_id).await?;
    let items = positions
        .into_iter()
        .map(|(id, order_position)| OrderItemDto { id, order_position })
        .collect();
    Ok(Json(ApiResponse::success(Some(items), None, None)))
}
