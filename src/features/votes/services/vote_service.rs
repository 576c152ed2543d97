use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::core::extractor::ClientContext;
use crate::features::links::services::link_service::find_visible;
use crate::features::votes::models::{VoteCounts, VoteDecision, VoteType};
use crate::shared::cache::CatalogCache;

/// Cookie-deduplicated link voting
pub struct VoteService {
    pool: PgPool,
    cache: Arc<CatalogCache>,
    cookie_secure: bool,
}

impl VoteService {
    pub fn new(pool: PgPool, cache: Arc<CatalogCache>, cookie_secure: bool) -> Self {
        Self {
            pool,
            cache,
            cookie_secure,
        }
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Counts of a visible link
    pub async fn counts(&self, link_id: Uuid) -> Result<VoteCounts> {
        let row = find_visible(&self.pool, link_id).await?;
        Ok(VoteCounts {
            upvote_count: row.link.upvote_count,
            downvote_count: row.link.downvote_count,
        })
    }

    /// Record a vote for `cookie_id`, replacing its earlier vote on the link.
    ///
    /// `previous` is the vote remembered in the visitor's per-link cookie.
    pub async fn cast(
        &self,
        link_id: Uuid,
        cookie_id: &str,
        previous: Option<VoteType>,
        requested: VoteType,
        client: &ClientContext,
    ) -> Result<VoteCounts> {
        let decision = VoteDecision::evaluate(previous, requested)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        find_visible(&mut *tx, link_id).await?;

        sqlx::query("DELETE FROM link_votes WHERE link_id = $1 AND cookie_id = $2")
            .bind(link_id)
            .bind(cookie_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "vote"))?;

        sqlx::query(
            r#"
            INSERT INTO link_votes (link_id, vote_type, cookie_id, ip_address, user_agent)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(link_id)
        .bind(requested)
        .bind(cookie_id)
        .bind(&client.ip_address)
        .bind(&client.user_agent)
        .execute(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "vote"))?;

        let counts: VoteCounts = sqlx::query_as(
            r#"
            UPDATE links
            SET upvote_count = (SELECT COUNT(*) FROM link_votes
                                WHERE link_id = $1 AND vote_type = 'upvote'),
                downvote_count = (SELECT COUNT(*) FROM link_votes
                                  WHERE link_id = $1 AND vote_type = 'downvote')
            WHERE id = $1
            RETURNING upvote_count, downvote_count
            "#,
        )
        .bind(link_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "vote"))?;

        tx.commit().await.map_err(AppError::Database)?;

        match decision {
            VoteDecision::Insert => {
                tracing::info!("Recorded {} on link {}", requested, link_id)
            }
            VoteDecision::Replace { previous } => tracing::info!(
                "Replaced {} with {} on link {}",
                previous,
                requested,
                link_id
            ),
        }

        self.cache.invalidate_links().await;
        Ok(counts)
    }
}
