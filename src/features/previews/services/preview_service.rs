use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::links::services::link_service::find_visible;
use crate::features::previews::models::{
    extract_metadata, LinkPreview, PageMetadata, LINK_PREVIEW_COLUMNS,
};
use crate::shared::cache::CatalogCache;
use crate::shared::fetcher::{parse_http_url, FetchError, LinkFetcher};

/// Fetches and stores Open Graph previews of link targets
pub struct PreviewService {
    pool: PgPool,
    fetcher: Arc<dyn LinkFetcher>,
    cache: Arc<CatalogCache>,
}

impl PreviewService {
    pub fn new(pool: PgPool, fetcher: Arc<dyn LinkFetcher>, cache: Arc<CatalogCache>) -> Self {
        Self {
            pool,
            fetcher,
            cache,
        }
    }

    /// Stored preview of a publicly visible link
    pub async fn get(&self, link_id: Uuid) -> Result<LinkPreview> {
        find_visible(&self.pool, link_id).await?;

        let query = format!(
            "SELECT {} FROM link_previews WHERE link_id = $1",
            LINK_PREVIEW_COLUMNS
        );
        sqlx::query_as::<_, LinkPreview>(&query)
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load preview for {}: {:?}", link_id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("No preview stored for link {}", link_id)))
    }

    async fn fetch_metadata(&self, url: &str) -> Result<PageMetadata> {
        let fetched = match parse_http_url(url) {
            Ok(base) => self.fetcher.fetch_html(url).await.map(|html| (base, html)),
            Err(e) => Err(e),
        };

        match fetched {
            Ok((base, html)) => Ok(extract_metadata(&html, &base)),
            Err(FetchError::InvalidUrl(reason)) => Err(AppError::BadRequest(format!(
                "Link URL cannot be fetched: {}",
                reason
            ))),
            Err(e) => {
                tracing::warn!("Preview fetch failed for {}: {}", url, e);
                Err(AppError::ExternalServiceError(format!(
                    "Failed to fetch link preview: {}",
                    e
                )))
            }
        }
    }

    /// Fetch the link's page now and upsert its preview
    pub async fn refresh(&self, link_id: Uuid) -> Result<LinkPreview> {
        let url: String = sqlx::query_scalar("SELECT url FROM links WHERE id = $1")
            .bind(link_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound(format!("Link with id {} not found", link_id)))?;

        let meta = self.fetch_metadata(&url).await?;
        let preview_image = meta.preview_image();

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let query = format!(
            r#"
            INSERT INTO link_previews
                (link_id, og_title, og_description, og_image, og_type, og_site_name,
                 twitter_card, twitter_title, twitter_description, twitter_image, preview_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (link_id) DO UPDATE SET
                og_title = EXCLUDED.og_title,
                og_description = EXCLUDED.og_description,
                og_image = EXCLUDED.og_image,
                og_type = EXCLUDED.og_type,
                og_site_name = EXCLUDED.og_site_name,
                twitter_card = EXCLUDED.twitter_card,
                twitter_title = EXCLUDED.twitter_title,
                twitter_description = EXCLUDED.twitter_description,
                twitter_image = EXCLUDED.twitter_image,
                preview_image = EXCLUDED.preview_image,
                fetched_at = NOW()
            RETURNING {}
            "#,
            LINK_PREVIEW_COLUMNS
        );

        let preview: LinkPreview = sqlx::query_as(&query)
            .bind(link_id)
            .bind(&meta.og_title)
            .bind(&meta.og_description)
            .bind(&meta.og_image)
            .bind(&meta.og_type)
            .bind(&meta.og_site_name)
            .bind(&meta.twitter_card)
            .bind(&meta.twitter_title)
            .bind(&meta.twitter_description)
            .bind(&meta.twitter_image)
            .bind(&preview_image)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store preview for {}: {:?}", link_id, e);
                AppError::Database(e)
            })?;

        sqlx::query("UPDATE links SET preview_image = $1, updated_at = NOW() WHERE id = $2")
            .bind(&preview_image)
            .bind(link_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;

        self.cache.invalidate_links().await;
        tracing::info!("Stored preview for link {}", link_id);
        Ok(preview)
    }
}
