use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::StatsSummaryDto;
use crate::features::analytics::models::{CategoryStats, StatsTotals, TopLink};
use crate::shared::constants::TOP_LINKS_LIMIT;

/// Aggregate numbers for the admin dashboard
pub struct StatsService {
    pool: PgPool,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn totals(&self) -> Result<StatsTotals> {
        sqlx::query_as::<_, StatsTotals>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM links) AS total_links,
                (SELECT COUNT(*) FROM links WHERE is_active) AS active_links,
                (SELECT COUNT(*) FROM links WHERE is_pinned) AS pinned_links,
                (SELECT COUNT(*) FROM categories) AS total_categories,
                (SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links) AS total_clicks,
                (SELECT COALESCE(SUM(upvote_count), 0)::BIGINT FROM links) AS total_upvotes,
                (SELECT COALESCE(SUM(downvote_count), 0)::BIGINT FROM links) AS total_downvotes
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn top_links(&self) -> Result<Vec<TopLink>> {
        sqlx::query_as::<_, TopLink>(
            r#"
            SELECT l.id, l.title, l.url, l.click_count, c.name AS category_name
            FROM links l
            LEFT JOIN categories c ON c.id = l.category_id
            ORDER BY l.click_count DESC, l.title ASC
            LIMIT $1
            "#,
        )
        .bind(TOP_LINKS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    async fn category_breakdown(&self) -> Result<Vec<CategoryStats>> {
        sqlx::query_as::<_, CategoryStats>(
            r#"
            SELECT c.id, c.name, c.slug,
                   COUNT(l.id) AS link_count,
                   COALESCE(SUM(l.click_count), 0)::BIGINT AS total_clicks
            FROM categories c
            LEFT JOIN links l ON l.category_id = c.id
            GROUP BY c.id, c.name, c.slug, c.order_position
            ORDER BY total_clicks DESC, c.order_position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }

    pub async fn summary(&self) -> Result<StatsSummaryDto> {
        let (totals, top_links, categories) =
            tokio::try_join!(self.totals(), self.top_links(), self.category_breakdown())
                .map_err(|e| {
                    tracing::error!("Failed to build stats summary: {:?}", e);
                    e
                })?;

        Ok(StatsSummaryDto {
            totals: totals.into(),
            top_links: top_links.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
        })
    }
}
