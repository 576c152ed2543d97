use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::pages::dtos::{
    CategoryPageDto, CategoryPageQueryParams, HomePageDto, HomeQueryParams, TagPageDto,
    TagPageQueryParams,
};
use crate::features::pages::services::PageService;
use crate::shared::types::ApiResponse;

/// Home page: pinned, featured, new this week, then one group per category
#[utoipa::path(
    get,
    path = "/api/home",
    params(HomeQueryParams),
    responses(
        (status = 200, description = "Home page sections", body = ApiResponse<HomePageDto>)
    ),
    tag = "pages"
)]
pub async fn get_home(
    State(service): State<Arc<PageService>>,
    Query(params): Query<HomeQueryParams>,
) -> Result<Json<ApiResponse<HomePageDto>>> {
    let layout = service.home(params.search.as_deref()).await?;
    Ok(Json(ApiResponse::success(Some(layout.into()), None, None)))
}

/// Category page with optional subcategory and search filters
#[utoipa::path(
    get,
    path = "/api/categories/{slug}/links",
    params(
        ("slug" = String, Path, description = "Category slug"),
        CategoryPageQueryParams
    ),
    responses(
        (status = 200, description = "Category page", body = ApiResponse<CategoryPageDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "pages"
)]
pub async fn get_category_page(
    State(service): State<Arc<PageService>>,
    Path(slug): Path<String>,
    Query(params): Query<CategoryPageQueryParams>,
) -> Result<Json<ApiResponse<CategoryPageDto>>> {
    let page = service
        .category(
            &slug,
            params.subcategory.as_deref(),
            params.search.as_deref(),
        )
        .await?;
    Ok(Json(ApiResponse::success(Some(page.into()), None, None)))
}

/// Links carrying a tag
#[utoipa::path(
    get,
    path = "/api/tags/{slug}/links",
    params(
        ("slug" = String, Path, description = "Tag slug"),
        TagPageQueryParams
    ),
    responses(
        (status = 200, description = "Tag page", body = ApiResponse<TagPageDto>),
        (status = 404, description = "Tag not found")
    ),
    tag = "pages"
)]
pub async fn get_tag_page(
    State(service): State<Arc<PageService>>,
    Path(slug): Path<String>,
    Query(params): Query<TagPageQueryParams>,
) -> Result<Json<ApiResponse<TagPageDto>>> {
    let (tag, links) = service.tag(&slug, params.search.as_deref()).await?;
    Ok(Json(ApiResponse::success(
        Some(TagPageDto::new(tag, links)),
        None,
        None,
    )))
}
