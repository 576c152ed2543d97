use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::health_checks::dtos::BulkHealthCheckResponseDto;
use crate::features::health_checks::models::{
    HealthOutcome, LinkHealthCheck, HEALTH_CHECK_COLUMNS,
};
use crate::shared::cache::CatalogCache;
use crate::shared::constants::HEALTH_CHECK_CONCURRENCY;
use crate::shared::fetcher::LinkFetcher;

/// HEAD the URL and classify the result
pub async fn probe(fetcher: &dyn LinkFetcher, url: &str) -> HealthOutcome {
    let started = Instant::now();
    let result = fetcher.head(url).await;
    HealthOutcome::classify(result, started.elapsed())
}

/// Server-side link health checks
pub struct HealthCheckService {
    pool: PgPool,
    fetcher: Arc<dyn LinkFetcher>,
    cache: Arc<CatalogCache>,
}

impl HealthCheckService {
    pub fn new(pool: PgPool, fetcher: Arc<dyn LinkFetcher>, cache: Arc<CatalogCache>) -> Self {
        Self {
            pool,
            fetcher,
            cache,
        }
    }

    async fn link_url(&self, link_id: Uuid) -> Result<String> {
        sqlx::query_scalar("SELECT url FROM links WHERE id = $1")
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load link {}: {:?}", link_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Link with id {} not found", link_id)))
    }

    /// Store a check and update the link's health summary
    async fn record(&self, link_id: Uuid, outcome: &HealthOutcome) -> Result<LinkHealthCheck> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let query = format!(
            r#"
            INSERT INTO link_health_checks
                (link_id, status_code, status_text, response_time_ms, is_healthy, error_message)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            HEALTH_CHECK_COLUMNS
        );
        let check: LinkHealthCheck = sqlx::query_as(&query)
            .bind(link_id)
            .bind(outcome.status_code)
            .bind(&outcome.status_text)
            .bind(outcome.response_time_ms)
            .bind(outcome.is_healthy)
            .bind(&outcome.error_message)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store health check for {}: {:?}", link_id, e);
                AppError::Database(e)
            })?;

        sqlx::query(
            "UPDATE links SET health_status = $1, last_health_check = $2 WHERE id = $3",
        )
        .bind(outcome.health_status())
        .bind(check.checked_at)
        .bind(link_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(check)
    }

    /// Check one link now
    pub async fn check_link(&self, link_id: Uuid) -> Result<LinkHealthCheck> {
        let url = self.link_url(link_id).await?;
        let outcome = probe(self.fetcher.as_ref(), &url).await;

        if outcome.is_healthy {
            tracing::info!("Link {} healthy ({})", link_id, outcome.status_text);
        } else {
            tracing::warn!(
                "Link {} unhealthy: {} {}",
                link_id,
                outcome.status_text,
                outcome.error_message.as_deref().unwrap_or_default()
            );
        }

        let check = self.record(link_id, &outcome).await?;
        self.cache.invalidate_links().await;
        Ok(check)
    }

    /// Check every active link with bounded concurrency
    pub async fn check_all_active(&self) -> Result<BulkHealthCheckResponseDto> {
        let links: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, url FROM links WHERE is_active ORDER BY order_position")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to list links for health check: {:?}", e);
                    AppError::Database(e)
                })?;

        let results: Vec<Result<LinkHealthCheck>> = stream::iter(links)
            .map(|(link_id, url)| async move {
                let outcome = probe(self.fetcher.as_ref(), &url).await;
                self.record(link_id, &outcome).await
            })
            .buffer_unordered(HEALTH_CHECK_CONCURRENCY)
            .collect()
            .await;

        let mut summary = BulkHealthCheckResponseDto::default();
        for result in results {
            summary.checked += 1;
            match result {
                Ok(check) if check.is_healthy => summary.healthy += 1,
                Ok(_) => summary.unhealthy += 1,
                Err(e) => {
                    tracing::error!("Health check could not be stored: {}", e);
                    summary.failed += 1;
                }
            }
        }

        self.cache.invalidate_links().await;
        tracing::info!(
            "Checked {} links: {} healthy, {} unhealthy, {} failed",
            summary.checked,
            summary.healthy,
            summary.unhealthy,
            summary.failed
        );
        Ok(summary)
    }

    /// Most recent check of a link, if it was ever checked
    pub async fn latest(&self, link_id: Uuid) -> Result<Option<LinkHealthCheck>> {
        let query = format!(
            r#"
            SELECT {}
            FROM link_health_checks
            WHERE link_id = $1
            ORDER BY checked_at DESC
            LIMIT 1
            "#,
            HEALTH_CHECK_COLUMNS
        );
        let latest = sqlx::query_as::<_, LinkHealthCheck>(&query)
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load health check for {}: {:?}", link_id, e);
                AppError::Database(e)
            })?;

        if latest.is_none() {
            // Distinguish "never checked" from "no such link"
            self.link_url(link_id).await?;
        }
        Ok(latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::fetcher::FetchError;
    use async_trait::async_trait;

    struct StubFetcher {
        head: fn() -> std::result::Result<u16, FetchError>,
    }

    #[async_trait]
    impl LinkFetcher for StubFetcher {
        async fn head(&self, _url: &str) -> std::result::Result<u16, FetchError> {
            (self.head)()
        }

        async fn fetch_html(&self, _url: &str) -> std::result::Result<String, FetchError> {
            Err(FetchError::Status(500))
        }
    }

    #[tokio::test]
    async fn test_probe_classifies_status() {
        let fetcher = StubFetcher { head: || Ok(204) };
        let outcome = probe(&fetcher, "https://example.com").await;
        assert!(outcome.is_healthy);
        assert_eq!(outcome.status_code, Some(204));
    }

    #[tokio::test]
    async fn test_probe_records_timeout() {
        let fetcher = StubFetcher {
            head: || Err(FetchError::Timeout(5)),
        };
        let outcome = probe(&fetcher, "https://slow.example.com").await;
        assert_eq!(outcome.status_text, "Timeout");
        assert_eq!(outcome.health_status(), "unhealthy");
    }
}
