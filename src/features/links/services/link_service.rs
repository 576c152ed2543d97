use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgExecutor;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::models::Category;
use crate::features::categories::services::CategoryService;
use crate::features::links::dtos::{CreateLinkDto, MoveLinkDto, UpdateLinkDto};
use crate::features::links::models::{Link, LinkWithCategory, LINK_WITH_CATEGORY_SELECT};
use crate::features::tags::models::{validate_tag_names, Tag};
use crate::features::tags::services::tag_service::{
    recount_usage, resolve_names_in, sync_link_tags,
};
use crate::features::tags::services::TagService;
use crate::shared::cache::CatalogCache;
use crate::shared::reorder::{move_by_id, persist_positions, PositionedTable};
use crate::shared::types::apply_nullable;

/// Blank subcategories are stored as NULL
fn normalize_subcategory(subcategory: Option<String>) -> Option<String> {
    subcategory
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Load a link the public may see; hidden links are reported as missing
pub async fn find_visible<'e, E>(executor: E, id: Uuid) -> Result<LinkWithCategory>
where
    E: PgExecutor<'e>,
{
    let query = format!("{} WHERE l.id = $1", LINK_WITH_CATEGORY_SELECT);
    let row = sqlx::query_as::<_, LinkWithCategory>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get link {}: {:?}", id, e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("Link with id {} not found", id)))?;

    row.link.ensure_visible_at(Utc::now())?;
    Ok(row)
}

/// Union of explicit tag ids and resolved tag names, in request order
async fn resolve_tag_ids(
    conn: &mut PgConnection,
    tag_ids: Option<&[Uuid]>,
    tag_names: Option<&[String]>,
) -> Result<Vec<Uuid>> {
    let mut ids: Vec<Uuid> = Vec::new();
    for id in tag_ids.unwrap_or_default() {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    if let Some(names) = tag_names {
        for tag in resolve_names_in(conn, names).await? {
            if !ids.contains(&tag.id) {
                ids.push(tag.id);
            }
        }
    }
    Ok(ids)
}

/// A subcategory must be one of its category's configured labels
fn check_subcategory(category: Option<&Category>, subcategory: Option<&str>) -> Result<()> {
    let Some(subcategory) = subcategory else {
        return Ok(());
    };

    match category {
        None => Err(AppError::Validation(
            "A subcategory requires a category".to_string(),
        )),
        Some(category) if !category.has_subcategory(subcategory) => {
            Err(AppError::Validation(format!(
                "'{}' is not a subcategory of '{}' (expected one of: {})",
                subcategory,
                category.name,
                category.subcategory_list().join(", ")
            )))
        }
        Some(_) => Ok(()),
    }
}

fn check_schedule(
    publish_at: Option<DateTime<Utc>>,
    unpublish_at: Option<DateTime<Utc>>,
) -> Result<()> {
    if let (Some(publish), Some(unpublish)) = (publish_at, unpublish_at) {
        if unpublish <= publish {
            return Err(AppError::Validation(
                "scheduled_unpublish_at must be after scheduled_publish_at".to_string(),
            ));
        }
    }
    Ok(())
}

/// Apply a partial update onto a loaded link (tags are handled separately)
fn apply_update(mut link: Link, dto: &UpdateLinkDto) -> Link {
    if let Some(title) = &dto.title {
        link.title = title.trim().to_string();
    }
    if let Some(url) = &dto.url {
        link.url = url.trim().to_string();
    }
    apply_nullable(&mut link.description, dto.description.clone());
    apply_nullable(&mut link.icon_name, dto.icon_name.clone());

    if let Some(category_id) = dto.category_id {
        if category_id != link.category_id && dto.subcategory.is_none() {
            link.subcategory = None;
        }
        link.category_id = category_id;
    }
    if let Some(subcategory) = dto.subcategory.clone() {
        link.subcategory = normalize_subcategory(subcategory);
    }

    if let Some(is_pinned) = dto.is_pinned {
        link.is_pinned = is_pinned;
    }
    if let Some(is_active) = dto.is_active {
        link.is_active = is_active;
    }
    if let Some(is_featured) = dto.is_featured {
        link.is_featured = is_featured;
    }
    if let Some(order_position) = dto.order_position {
        link.order_position = order_position;
    }
    apply_nullable(&mut link.expiration_date, dto.expiration_date);
    apply_nullable(&mut link.scheduled_publish_at, dto.scheduled_publish_at);
    apply_nullable(&mut link.scheduled_unpublish_at, dto.scheduled_unpublish_at);

    link
}

/// Service for link CRUD, listing and ordering
pub struct LinkService {
    pool: PgPool,
    cache: Arc<CatalogCache>,
    tags: Arc<TagService>,
    categories: Arc<CategoryService>,
}

impl LinkService {
    pub fn new(
        pool: PgPool,
        cache: Arc<CatalogCache>,
        tags: Arc<TagService>,
        categories: Arc<CategoryService>,
    ) -> Self {
        Self {
            pool,
            cache,
            tags,
            categories,
        }
    }

    /// Active links with their category, pinned first then by position
    async fn active_links(&self) -> Result<Vec<LinkWithCategory>> {
        if let Some(links) = self.cache.links.get().await {
            return Ok(links);
        }

        let query = format!(
            "{} WHERE l.is_active ORDER BY l.is_pinned DESC, l.order_position ASC, l.created_at DESC",
            LINK_WITH_CATEGORY_SELECT
        );
        let links: Vec<LinkWithCategory> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list active links: {:?}", e);
                AppError::Database(e)
            })?;

        self.cache.links.set(links.clone()).await;
        Ok(links)
    }

    /// Links visible right now (active, not expired, inside their schedule)
    pub async fn list_visible(&self) -> Result<Vec<LinkWithCategory>> {
        let now = Utc::now();
        Ok(self
            .active_links()
            .await?
            .into_iter()
            .filter(|row| row.link.is_visible_at(now))
            .collect())
    }

    /// Every link regardless of visibility (admin)
    pub async fn list_all(&self) -> Result<Vec<LinkWithCategory>> {
        let query = format!(
            "{} ORDER BY l.is_pinned DESC, l.order_position ASC, l.created_at DESC",
            LINK_WITH_CATEGORY_SELECT
        );
        sqlx::query_as::<_, LinkWithCategory>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list links: {:?}", e);
                AppError::Database(e)
            })
    }

    pub async fn get(&self, id: Uuid) -> Result<LinkWithCategory> {
        let query = format!("{} WHERE l.id = $1", LINK_WITH_CATEGORY_SELECT);
        sqlx::query_as::<_, LinkWithCategory>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get link {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Link with id {} not found", id)))
    }

    /// Same as [`get`](Self::get) but hidden links are reported as missing
    pub async fn get_visible(&self, id: Uuid) -> Result<LinkWithCategory> {
        find_visible(&self.pool, id).await
    }

    async fn category_for(&self, category_id: Option<Uuid>) -> Result<Option<Category>> {
        match category_id {
            Some(id) => match self.categories.get_by_id(id).await {
                Ok(category) => Ok(Some(category)),
                Err(AppError::NotFound(_)) => Err(AppError::BadRequest(format!(
                    "Category {} does not exist",
                    id
                ))),
                Err(e) => Err(e),
            },
            None => Ok(None),
        }
    }

    /// Insert a link with its tags; nothing persists if any tag is rejected
    pub async fn create(&self, dto: CreateLinkDto) -> Result<LinkWithCategory> {
        if let Some(names) = dto.tag_names.as_deref() {
            validate_tag_names(names)?;
        }
        let subcategory = normalize_subcategory(dto.subcategory.clone());
        let category = self.category_for(dto.category_id).await?;
        check_subcategory(category.as_ref(), subcategory.as_deref())?;
        check_schedule(dto.scheduled_publish_at, dto.scheduled_unpublish_at)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO links (title, url, description, icon_name, category_id, subcategory,
                               is_pinned, is_active, is_featured, order_position,
                               expiration_date, scheduled_publish_at, scheduled_unpublish_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                    COALESCE($10, (SELECT COALESCE(MAX(order_position) + 1, 0)
                                   FROM links WHERE category_id IS NOT DISTINCT FROM $5)),
                    $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(dto.title.trim())
        .bind(dto.url.trim())
        .bind(&dto.description)
        .bind(&dto.icon_name)
        .bind(dto.category_id)
        .bind(&subcategory)
        .bind(dto.is_pinned.unwrap_or(false))
        .bind(dto.is_active.unwrap_or(true))
        .bind(dto.is_featured.unwrap_or(false))
        .bind(dto.order_position)
        .bind(dto.expiration_date)
        .bind(dto.scheduled_publish_at)
        .bind(dto.scheduled_unpublish_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "link"))?;

        let tag_ids =
            resolve_tag_ids(&mut *tx, dto.tag_ids.as_deref(), dto.tag_names.as_deref()).await?;
        if !tag_ids.is_empty() {
            sync_link_tags(&mut *tx, id, &tag_ids).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        self.cache.invalidate_links().await;
        tracing::info!("Created link {}", id);

        self.get(id).await
    }

    /// Apply a partial update and tag changes together
    pub async fn update(&self, id: Uuid, dto: UpdateLinkDto) -> Result<LinkWithCategory> {
        if let Some(names) = dto.tag_names.as_deref() {
            validate_tag_names(names)?;
        }
        let existing = self.get(id).await?.link;
        let updated = apply_update(existing, &dto);

        let category = self.category_for(updated.category_id).await?;
        check_subcategory(category.as_ref(), updated.subcategory.as_deref())?;
        check_schedule(updated.scheduled_publish_at, updated.scheduled_unpublish_at)?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let result = sqlx::query(
            r#"
            UPDATE links
            SET title = $1, url = $2, description = $3, icon_name = $4, category_id = $5,
                subcategory = $6, is_pinned = $7, is_active = $8, is_featured = $9,
                order_position = $10, expiration_date = $11, scheduled_publish_at = $12,
                scheduled_unpublish_at = $13, updated_at = NOW()
            WHERE id = $14
            "#,
        )
        .bind(&updated.title)
        .bind(&updated.url)
        .bind(&updated.description)
        .bind(&updated.icon_name)
        .bind(updated.category_id)
        .bind(&updated.subcategory)
        .bind(updated.is_pinned)
        .bind(updated.is_active)
        .bind(updated.is_featured)
        .bind(updated.order_position)
        .bind(updated.expiration_date)
        .bind(updated.scheduled_publish_at)
        .bind(updated.scheduled_unpublish_at)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "link"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Link with id {} not found", id)));
        }

        if dto.touches_tags() {
            let tag_ids =
                resolve_tag_ids(&mut *tx, dto.tag_ids.as_deref(), dto.tag_names.as_deref())
                    .await?;
            sync_link_tags(&mut *tx, id, &tag_ids).await?;
        }

        tx.commit().await.map_err(AppError::Database)?;

        self.cache.invalidate_links().await;
        self.get(id).await
    }

    /// Delete a link; its tags, votes, checks, preview and analytics go with it
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let tag_ids: Vec<Uuid> = sqlx::query_scalar("SELECT tag_id FROM link_tags WHERE link_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "link"))?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(AppError::Database)?;
            return Err(AppError::NotFound(format!("Link with id {} not found", id)));
        }

        recount_usage(&mut *tx, &tag_ids).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.cache.invalidate_links().await;
        tracing::info!("Deleted link {}", id);
        Ok(())
    }

    pub async fn reorder(&self, positions: &[(Uuid, i32)]) -> Result<()> {
        persist_positions(&self.pool, PositionedTable::Links, positions).await?;
        self.cache.invalidate_links().await;
        Ok(())
    }

    /// Move a link within its category (optionally one subcategory) and renumber the group
    pub async fn move_link(&self, dto: &MoveLinkDto) -> Result<Vec<(Uuid, i32)>> {
        let active = self.get(dto.active_id).await?.link;
        let subcategory = normalize_subcategory(dto.subcategory.clone());

        let ordered: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM links
            WHERE category_id IS NOT DISTINCT FROM $1
              AND ($2::text IS NULL OR subcategory = $2)
            ORDER BY order_position ASC, created_at ASC
            "#,
        )
        .bind(active.category_id)
        .bind(&subcategory)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load link order: {:?}", e);
            AppError::Database(e)
        })?;

        let positions = move_by_id(&ordered, dto.active_id, dto.over_id)?;
        self.reorder(&positions).await?;
        Ok(positions)
    }

    /// Tags of a publicly visible link
    pub async fn visible_link_tags(&self, id: Uuid) -> Result<Vec<Tag>> {
        self.get_visible(id).await?;
        self.tags.tags_for_link(id).await
    }

    pub async fn sync_tags(&self, id: Uuid, tag_ids: &[Uuid]) -> Result<Vec<Tag>> {
        self.get(id).await?;
        self.tags.sync_link(id, tag_ids).await
    }

    pub async fn add_tag(&self, id: Uuid, tag_id: Uuid) -> Result<Vec<Tag>> {
        self.get(id).await?;
        self.tags.get_by_id(tag_id).await?;
        self.tags.add_to_link(id, tag_id).await?;
        self.tags.tags_for_link(id).await
    }

    pub async fn remove_tag(&self, id: Uuid, tag_id: Uuid) -> Result<()> {
        self.tags.remove_from_link(id, tag_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::links::models::link::fixtures::link;

    fn category(subcategories: Option<&str>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: "AI".to_string(),
            slug: "ai".to_string(),
            icon_name: None,
            color: None,
            order_position: 0,
            show_on_home: true,
            subcategories: subcategories.map(str::to_string),
            description: None,
            background_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_check_subcategory() {
        let ai = category(Some("Tools,Research"));
        assert!(check_subcategory(Some(&ai), Some("Tools")).is_ok());
        assert!(check_subcategory(Some(&ai), None).is_ok());
        assert!(matches!(
            check_subcategory(Some(&ai), Some("News")),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_subcategory(None, Some("Tools")),
            Err(AppError::Validation(_))
        ));
        assert!(check_subcategory(Some(&category(None)), Some("Tools")).is_err());
    }

    #[test]
    fn test_normalize_subcategory() {
        assert_eq!(normalize_subcategory(Some("  ".to_string())), None);
        assert_eq!(
            normalize_subcategory(Some(" Tools ".to_string())).as_deref(),
            Some("Tools")
        );
    }

    #[test]
    fn test_category_change_clears_subcategory() {
        let mut original = link("Paper");
        original.category_id = Some(Uuid::new_v4());
        original.subcategory = Some("Research".to_string());

        let dto = UpdateLinkDto {
            category_id: Some(Some(Uuid::new_v4())),
            ..Default::default()
        };
        let updated = apply_update(original.clone(), &dto);
        assert!(updated.subcategory.is_none());

        let explicit = UpdateLinkDto {
            category_id: Some(original.category_id),
            title: Some(" Renamed ".to_string()),
            ..Default::default()
        };
        let kept = apply_update(original, &explicit);
        assert_eq!(kept.subcategory.as_deref(), Some("Research"));
        assert_eq!(kept.title, "Renamed");
    }

    #[test]
    fn test_update_clears_expiration() {
        let mut original = link("Promo");
        original.expiration_date = Some(Utc::now());

        let dto: UpdateLinkDto =
            serde_json::from_value(serde_json::json!({ "expiration_date": null })).unwrap();
        assert!(apply_update(original, &dto).expiration_date.is_none());
    }

    #[test]
    fn test_schedule_must_be_ordered() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::hours(1);
        let later = now + chrono::Duration::hours(1);

        assert!(check_schedule(Some(now), Some(earlier)).is_err());
        assert!(check_schedule(Some(now), Some(now)).is_err());
        assert!(check_schedule(Some(now), Some(later)).is_ok());
        assert!(check_schedule(None, Some(earlier)).is_ok());
    }

    fn service() -> LinkService {
        let pool = crate::core::database::lazy_test_pool();
        let cache = Arc::new(CatalogCache::new(std::time::Duration::from_secs(60)));
        LinkService::new(
            pool.clone(),
            cache.clone(),
            Arc::new(TagService::new(pool.clone(), cache.clone())),
            Arc::new(CategoryService::new(pool, cache)),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_bad_tag_before_writing() {
        let dto: CreateLinkDto = serde_json::from_value(serde_json::json!({
            "title": "Paper",
            "url": "https://example.com/paper",
            "tag_names": ["research", "!!!"]
        }))
        .unwrap();

        // The pool cannot connect, so reaching the insert would surface a Database error.
        let err = service().create(dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("!!!")));
    }

    #[tokio::test]
    async fn test_update_rejects_bad_tag_before_writing() {
        let dto = UpdateLinkDto {
            title: Some("Renamed".to_string()),
            tag_names: Some(vec!["   ".to_string(), "@#$".to_string()]),
            ..Default::default()
        };

        let err = service().update(Uuid::new_v4(), dto).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
