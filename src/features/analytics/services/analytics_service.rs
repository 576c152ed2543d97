use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::ClientContext;
use crate::features::analytics::dtos::{AnalyticsQueryParams, SessionQueryParams};
use crate::features::analytics::models::{
    parse_user_agent, AnalyticsSession, LinkAnalytics, ANALYTICS_COLUMNS, SESSION_COLUMNS,
};

/// Click tracking and raw analytics reads
pub struct AnalyticsService {
    pool: PgPool,
    cookie_secure: bool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool, cookie_secure: bool) -> Self {
        Self {
            pool,
            cookie_secure,
        }
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Record a click and return the link's new click count.
    ///
    /// Cached link lists pick up the new count when their TTL expires.
    pub async fn track_click(
        &self,
        link_id: Uuid,
        session_id: &str,
        client: &ClientContext,
    ) -> Result<i32> {
        let device = parse_user_agent(client.user_agent.as_deref());

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let click_count: i32 = sqlx::query_scalar(
            "UPDATE links SET click_count = click_count + 1 WHERE id = $1 RETURNING click_count",
        )
        .bind(link_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Link with id {} not found", link_id)))?;

        sqlx::query(
            r#"
            INSERT INTO link_analytics
                (link_id, device_type, browser, os, user_agent, referrer, session_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(link_id)
        .bind(&device.device_type)
        .bind(&device.browser)
        .bind(&device.os)
        .bind(&client.user_agent)
        .bind(&client.referrer)
        .bind(session_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record click on {}: {:?}", link_id, e);
            AppError::Database(e)
        })?;

        sqlx::query(
            r#"
            INSERT INTO analytics_sessions
                (session_id, total_clicks, device_type, browser, os, referrer)
            VALUES ($1, 1, $2, $3, $4, $5)
            ON CONFLICT (session_id) DO UPDATE SET
                total_clicks = analytics_sessions.total_clicks + 1,
                last_seen_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(&device.device_type)
        .bind(&device.browser)
        .bind(&device.os)
        .bind(&client.referrer)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        tracing::debug!("Click on {} ({} total)", link_id, click_count);
        Ok(click_count)
    }

    /// Raw clicks, newest first
    pub async fn list(&self, params: &AnalyticsQueryParams) -> Result<Vec<LinkAnalytics>> {
        let query = format!(
            r#"
            SELECT {}
            FROM link_analytics
            WHERE ($1::uuid IS NULL OR link_id = $1)
              AND ($2::timestamptz IS NULL OR clicked_at >= $2)
              AND ($3::timestamptz IS NULL OR clicked_at <= $3)
            ORDER BY clicked_at DESC
            LIMIT $4
            "#,
            ANALYTICS_COLUMNS
        );

        sqlx::query_as::<_, LinkAnalytics>(&query)
            .bind(params.link_id)
            .bind(params.from)
            .bind(params.to)
            .bind(params.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list analytics: {:?}", e);
                AppError::Database(e)
            })
    }

    /// Sessions inside the window, most recently active first
    pub async fn sessions(&self, params: &SessionQueryParams) -> Result<Vec<AnalyticsSession>> {
        params.check_range()?;

        let query = format!(
            r#"
            SELECT {}
            FROM analytics_sessions
            WHERE ($1::timestamptz IS NULL OR first_seen_at >= $1)
              AND ($2::timestamptz IS NULL OR last_seen_at <= $2)
            ORDER BY last_seen_at DESC
            LIMIT $3
            "#,
            SESSION_COLUMNS
        );

        sqlx::query_as::<_, AnalyticsSession>(&query)
            .bind(params.from)
            .bind(params.to)
            .bind(params.limit())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list analytics sessions: {:?}", e);
                AppError::Database(e)
            })
    }
}
