use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::analytics::models::{CategoryStats, StatsTotals, TopLink};

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsTotalsDto {
    pub total_links: i64,
    pub active_links: i64,
    pub pinned_links: i64,
    pub total_categories: i64,
    pub total_clicks: i64,
    pub total_upvotes: i64,
    pub total_downvotes: i64,
}

impl From<StatsTotals> for StatsTotalsDto {
    fn from(t: StatsTotals) -> Self {
        Self {
            total_links: t.total_links,
            active_links: t.active_links,
            pinned_links: t.pinned_links,
            total_categories: t.total_categories,
            total_clicks: t.total_clicks,
            total_upvotes: t.total_upvotes,
            total_downvotes: t.total_downvotes,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TopLinkDto {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub click_count: i32,
    pub category_name: Option<String>,
}

impl From<TopLink> for TopLinkDto {
    fn from(t: TopLink) -> Self {
        Self {
            id: t.id,
            title: t.title,
            url: t.url,
            click_count: t.click_count,
            category_name: t.category_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryStatsDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub link_count: i64,
    pub total_clicks: i64,
}

impl From<CategoryStats> for CategoryStatsDto {
    fn from(c: CategoryStats) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            link_count: c.link_count,
            total_clicks: c.total_clicks,
        }
    }
}

/// Admin dashboard summary
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsSummaryDto {
    pub totals: StatsTotalsDto,
    pub top_links: Vec<TopLinkDto>,
    pub categories: Vec<CategoryStatsDto>,
}
