use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Default, FromRow)]
pub struct StatsTotals {
    pub total_links: i64,
    pub active_links: i64,
    pub pinned_links: i64,
    pub total_categories: i64,
    pub total_clicks: i64,
    pub total_upvotes: i64,
    pub total_downvotes: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct TopLink {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub click_count: i32,
    pub category_name: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryStats {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub link_count: i64,
    pub total_clicks: i64,
}
