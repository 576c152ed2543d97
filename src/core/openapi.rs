use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{dtos as analytics_dtos, handlers as analytics_handlers};
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::exports::handlers as exports_handlers;
use crate::features::health_checks::{
    dtos as health_checks_dtos, handlers as health_checks_handlers,
};
use crate::features::links::{dtos as links_dtos, handlers as links_handlers};
use crate::features::pages::{dtos as pages_dtos, handlers as pages_handlers};
use crate::features::previews::{dtos as previews_dtos, handlers as previews_handlers};
use crate::features::sitemap::handlers as sitemap_handlers;
use crate::features::tags::{dtos as tags_dtos, handlers as tags_handlers};
use crate::features::votes::{
    dtos as votes_dtos, handlers as votes_handlers, models as votes_models,
};
use crate::shared::reorder::{OrderItemDto, ReorderDto};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // Pages (public)
        pages_handlers::get_home,
        pages_handlers::get_category_page,
        pages_handlers::get_tag_page,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        categories_handlers::clear_category_links,
        categories_handlers::reorder_categories,
        categories_handlers::move_category,
        // Tags
        tags_handlers::list_tags,
        tags_handlers::get_tag,
        tags_handlers::create_tag,
        tags_handlers::update_tag,
        tags_handlers::delete_tag,
        tags_handlers::resolve_tags,
        // Links
        links_handlers::list_links,
        links_handlers::get_link,
        links_handlers::list_link_tags,
        links_handlers::list_all_links,
        links_handlers::create_link,
        links_handlers::update_link,
        links_handlers::delete_link,
        links_handlers::reorder_links,
        links_handlers::move_link,
        links_handlers::sync_link_tags,
        links_handlers::add_link_tag,
        links_handlers::remove_link_tag,
        // Votes (public)
        votes_handlers::get_vote,
        votes_handlers::cast_vote,
        // Health checks
        health_checks_handlers::get_link_health,
        health_checks_handlers::check_link_health,
        health_checks_handlers::check_all_links,
        // Previews
        previews_handlers::get_preview,
        previews_handlers::refresh_preview,
        // Analytics
        analytics_handlers::track_click,
        analytics_handlers::list_analytics,
        analytics_handlers::list_sessions,
        analytics_handlers::get_stats,
        // Exports (admin)
        exports_handlers::export_links,
        exports_handlers::export_analytics,
        // Sitemap
        sitemap_handlers::get_sitemap,
    ),
    components(
        schemas(
            // Shared
            Meta,
            ReorderDto,
            OrderItemDto,
            ApiResponse<Vec<OrderItemDto>>,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::AuthenticatedUser,
            ApiResponse<auth::dto::MeResponseDto>,
            // Pages
            pages_dtos::HomePageDto,
            pages_dtos::CategoryGroupDto,
            pages_dtos::CategoryPageDto,
            pages_dtos::TagPageDto,
            ApiResponse<pages_dtos::HomePageDto>,
            ApiResponse<pages_dtos::CategoryPageDto>,
            ApiResponse<pages_dtos::TagPageDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategorySummaryDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::MoveCategoryDto,
            categories_dtos::ClearCategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::ClearCategoryResponseDto>,
            // Tags
            tags_dtos::TagResponseDto,
            tags_dtos::CreateTagDto,
            tags_dtos::UpdateTagDto,
            tags_dtos::ResolveTagsDto,
            ApiResponse<Vec<tags_dtos::TagResponseDto>>,
            ApiResponse<tags_dtos::TagResponseDto>,
            // Links
            links_dtos::LinkResponseDto,
            links_dtos::PlatformDto,
            links_dtos::CreateLinkDto,
            links_dtos::UpdateLinkDto,
            links_dtos::MoveLinkDto,
            links_dtos::SyncLinkTagsDto,
            links_dtos::AddLinkTagDto,
            ApiResponse<Vec<links_dtos::LinkResponseDto>>,
            ApiResponse<links_dtos::LinkResponseDto>,
            // Votes
            votes_models::VoteType,
            votes_dtos::CastVoteDto,
            votes_dtos::VoteStatusDto,
            ApiResponse<votes_dtos::VoteStatusDto>,
            // Health checks
            health_checks_dtos::HealthCheckResponseDto,
            health_checks_dtos::BulkHealthCheckResponseDto,
            ApiResponse<health_checks_dtos::HealthCheckResponseDto>,
            ApiResponse<health_checks_dtos::BulkHealthCheckResponseDto>,
            // Previews
            previews_dtos::LinkPreviewResponseDto,
            ApiResponse<previews_dtos::LinkPreviewResponseDto>,
            // Analytics
            analytics_dtos::ClickResponseDto,
            analytics_dtos::LinkAnalyticsResponseDto,
            analytics_dtos::AnalyticsSessionResponseDto,
            analytics_dtos::StatsSummaryDto,
            analytics_dtos::StatsTotalsDto,
            analytics_dtos::TopLinkDto,
            analytics_dtos::CategoryStatsDto,
            ApiResponse<analytics_dtos::ClickResponseDto>,
            ApiResponse<Vec<analytics_dtos::LinkAnalyticsResponseDto>>,
            ApiResponse<Vec<analytics_dtos::AnalyticsSessionResponseDto>>,
            ApiResponse<analytics_dtos::StatsSummaryDto>,
        )
    ),
    tags(
        (name = "auth", description = "Current user and role check"),
        (name = "pages", description = "Composed home, category and tag pages (public)"),
        (name = "categories", description = "Link categories"),
        (name = "tags", description = "Link tags"),
        (name = "links", description = "Links, ordering and tag assignment"),
        (name = "votes", description = "Cookie-based up/down votes (public)"),
        (name = "health-checks", description = "Link reachability checks"),
        (name = "previews", description = "Open Graph previews of link targets"),
        (name = "analytics", description = "Click tracking and admin stats"),
        (name = "exports", description = "CSV downloads (admin only)"),
        (name = "sitemap", description = "XML sitemap"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Link Hub API",
        version = "0.1.0",
        description = "API documentation for the link hub",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
