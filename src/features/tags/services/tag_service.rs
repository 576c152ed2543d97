use std::sync::Arc;

use sqlx::postgres::PgExecutor;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::tags::dtos::{CreateTagDto, UpdateTagDto};
use crate::features::tags::models::tag::TagDiff;
use crate::features::tags::models::{
    diff_tag_sets, find_by_name_ci, missing_tag_ids, validate_tag_names, Tag, TAG_COLUMNS,
};
use crate::shared::cache::CatalogCache;
use crate::shared::constants::DEFAULT_TAG_COLOR;
use crate::shared::types::apply_nullable;
use crate::shared::validation::slugify;

/// Recompute `usage_count` from `link_tags` for the given tags
pub async fn recount_usage<'e, E>(executor: E, tag_ids: &[Uuid]) -> Result<()>
where
    E: PgExecutor<'e>,
{
    if tag_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        UPDATE tags t
        SET usage_count = (SELECT COUNT(*) FROM link_tags lt WHERE lt.tag_id = t.id),
            updated_at = NOW()
        WHERE t.id = ANY($1)
        "#,
    )
    .bind(tag_ids)
    .execute(executor)
    .await
    .map_err(|e| {
        tracing::error!("Failed to recount tag usage: {:?}", e);
        AppError::Database(e)
    })?;

    Ok(())
}

async fn insert_tag<'e, E>(
    executor: E,
    name: &str,
    slug: &str,
    color: &str,
    description: Option<&str>,
) -> Result<Tag>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        r#"
        INSERT INTO tags (name, slug, color, description)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        TAG_COLUMNS
    );

    let tag: Tag = sqlx::query_as(&query)
        .bind(name)
        .bind(slug)
        .bind(color)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| handle_db_error(e, "tag"))?;

    tracing::info!("Created tag {} ({})", tag.slug, tag.id);
    Ok(tag)
}

/// Map names onto tags on the caller's connection, reusing case-insensitive
/// matches and creating the rest.
///
/// The result keeps request order and holds each tag once.
pub async fn resolve_names_in(conn: &mut PgConnection, names: &[String]) -> Result<Vec<Tag>> {
    validate_tag_names(names)?;

    let query = format!("SELECT {} FROM tags", TAG_COLUMNS);
    let mut known: Vec<Tag> = sqlx::query_as(&query)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load tags: {:?}", e);
            AppError::Database(e)
        })?;
    let mut resolved: Vec<Tag> = Vec::new();

    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let tag = match find_by_name_ci(&known, name) {
            Some(existing) => existing.clone(),
            None => {
                let created =
                    insert_tag(&mut *conn, name, &slugify(name), DEFAULT_TAG_COLOR, None).await?;
                known.push(created.clone());
                created
            }
        };

        if !resolved.iter().any(|t| t.id == tag.id) {
            resolved.push(tag);
        }
    }

    Ok(resolved)
}

/// Make a link carry exactly `desired` on the caller's connection, touching
/// only the difference. Unknown tag ids are rejected before anything changes.
pub async fn sync_link_tags(
    conn: &mut PgConnection,
    link_id: Uuid,
    desired: &[Uuid],
) -> Result<TagDiff> {
    let current: Vec<Uuid> =
        sqlx::query_scalar("SELECT tag_id FROM link_tags WHERE link_id = $1 FOR UPDATE")
            .bind(link_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(AppError::Database)?;

    let diff = diff_tag_sets(&current, desired);
    if diff.is_empty() {
        return Ok(diff);
    }

    if !diff.to_add.is_empty() {
        let found: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM tags WHERE id = ANY($1)")
            .bind(&diff.to_add)
            .fetch_all(&mut *conn)
            .await
            .map_err(AppError::Database)?;

        let missing = missing_tag_ids(&diff.to_add, &found);
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(Uuid::to_string).collect();
            return Err(AppError::BadRequest(format!(
                "Unknown tag id(s): {}",
                ids.join(", ")
            )));
        }
    }

    if !diff.to_remove.is_empty() {
        sqlx::query("DELETE FROM link_tags WHERE link_id = $1 AND tag_id = ANY($2)")
            .bind(link_id)
            .bind(&diff.to_remove)
            .execute(&mut *conn)
            .await
            .map_err(|e| handle_db_error(e, "link tag"))?;
    }

    if !diff.to_add.is_empty() {
        sqlx::query(
            r#"
            INSERT INTO link_tags (link_id, tag_id)
            SELECT $1, tag_id FROM UNNEST($2::uuid[]) AS t(tag_id)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(link_id)
        .bind(&diff.to_add)
        .execute(&mut *conn)
        .await
        .map_err(|e| handle_db_error(e, "link tag"))?;
    }

    recount_usage(&mut *conn, &diff.touched()).await?;

    tracing::info!(
        "Synced tags for link {}: +{} -{}",
        link_id,
        diff.to_add.len(),
        diff.to_remove.len()
    );
    Ok(diff)
}

/// Service for tag operations and link-tag associations
pub struct TagService {
    pool: PgPool,
    cache: Arc<CatalogCache>,
}

impl TagService {
    pub fn new(pool: PgPool, cache: Arc<CatalogCache>) -> Self {
        Self { pool, cache }
    }

    /// List all tags, most used first
    pub async fn list(&self) -> Result<Vec<Tag>> {
        let query = format!(
            "SELECT {} FROM tags ORDER BY usage_count DESC, name ASC",
            TAG_COLUMNS
        );
        sqlx::query_as::<_, Tag>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list tags: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Tag> {
        let query = format!("SELECT {} FROM tags WHERE slug = $1", TAG_COLUMNS);
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get tag {}: {:?}", slug, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Tag '{}' not found", slug)))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Tag> {
        let query = format!("SELECT {} FROM tags WHERE id = $1", TAG_COLUMNS);
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get tag {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", id)))
    }

    pub async fn create(&self, dto: CreateTagDto) -> Result<Tag> {
        let name = dto.name.trim();
        let slug = dto.slug.unwrap_or_else(|| slugify(name));
        if slug.is_empty() {
            return Err(AppError::Validation(
                "Could not derive a slug from the name; provide one explicitly".to_string(),
            ));
        }

        let color = dto.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR);
        insert_tag(&self.pool, name, &slug, color, dto.description.as_deref()).await
    }

    pub async fn update(&self, id: Uuid, dto: UpdateTagDto) -> Result<Tag> {
        let mut tag = self.get_by_id(id).await?;
        if let Some(name) = dto.name {
            tag.name = name.trim().to_string();
        }
        if let Some(slug) = dto.slug {
            tag.slug = slug;
        }
        if let Some(color) = dto.color {
            tag.color = color;
        }
        apply_nullable(&mut tag.description, dto.description);

        let query = format!(
            r#"
            UPDATE tags
            SET name = $1, slug = $2, color = $3, description = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {}
            "#,
            TAG_COLUMNS
        );

        let updated = sqlx::query_as::<_, Tag>(&query)
            .bind(&tag.name)
            .bind(&tag.slug)
            .bind(&tag.color)
            .bind(&tag.description)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "tag"))?
            .ok_or_else(|| AppError::NotFound(format!("Tag with id {} not found", id)))?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "tag"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tag with id {} not found", id)));
        }

        tracing::info!("Deleted tag {}", id);
        Ok(())
    }

    /// Create-or-reuse tags by name in one transaction
    pub async fn resolve_names(&self, names: &[String]) -> Result<Vec<Tag>> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let tags = resolve_names_in(&mut *tx, names).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(tags)
    }

    /// Tags attached to a link, by name
    pub async fn tags_for_link(&self, link_id: Uuid) -> Result<Vec<Tag>> {
        let query = format!(
            r#"
            SELECT {}
            FROM tags
            WHERE id IN (SELECT tag_id FROM link_tags WHERE link_id = $1)
            ORDER BY name ASC
            "#,
            TAG_COLUMNS
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(link_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load tags for link {}: {:?}", link_id, e);
                AppError::Database(e)
            })
    }

    pub async fn link_ids_for_tag(&self, tag_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar("SELECT link_id FROM link_tags WHERE tag_id = $1")
            .bind(tag_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to load links for tag {}: {:?}", tag_id, e);
                AppError::Database(e)
            })
    }

    /// Attach a tag to a link. Attaching twice is a no-op.
    pub async fn add_to_link(&self, link_id: Uuid, tag_id: Uuid) -> Result<()> {
        sqlx::query(
            "INSERT INTO link_tags (link_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(link_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await
        .map_err(|e| handle_db_error(e, "link tag"))?;

        recount_usage(&self.pool, &[tag_id]).await?;
        self.cache.invalidate_links().await;
        Ok(())
    }

    pub async fn remove_from_link(&self, link_id: Uuid, tag_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM link_tags WHERE link_id = $1 AND tag_id = $2")
            .bind(link_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "link tag"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Tag {} is not attached to link {}",
                tag_id, link_id
            )));
        }

        recount_usage(&self.pool, &[tag_id]).await?;
        self.cache.invalidate_links().await;
        Ok(())
    }

    /// Make a link carry exactly `desired`
    pub async fn sync_link(&self, link_id: Uuid, desired: &[Uuid]) -> Result<Vec<Tag>> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let diff = sync_link_tags(&mut *tx, link_id, desired).await?;
        tx.commit().await.map_err(AppError::Database)?;

        if !diff.is_empty() {
            self.cache.invalidate_links().await;
        }
        self.tags_for_link(link_id).await
    }
}
