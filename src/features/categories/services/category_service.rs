use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{handle_db_error, AppError, Result};
use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::{join_subcategories, Category, CATEGORY_COLUMNS};
use crate::features::tags::services::tag_service::recount_usage;
use crate::shared::cache::CatalogCache;
use crate::shared::reorder::{move_by_id, persist_positions, PositionedTable};
use crate::shared::types::apply_nullable;
use crate::shared::validation::slugify;

/// Apply a partial update onto a loaded category.
///
/// Time-based categories keep their slug.
fn apply_update(mut category: Category, dto: UpdateCategoryDto) -> Result<Category> {
    if let Some(slug) = dto.slug {
        if slug != category.slug && category.is_time_based() {
            return Err(AppError::Conflict(format!(
                "The slug of time-based category '{}' cannot be changed",
                category.slug
            )));
        }
        category.slug = slug;
    }

    if let Some(name) = dto.name {
        category.name = name.trim().to_string();
    }
    if let Some(order_position) = dto.order_position {
        category.order_position = order_position;
    }
    if let Some(show_on_home) = dto.show_on_home {
        category.show_on_home = show_on_home;
    }
    if let Some(labels) = dto.subcategories {
        category.subcategories = join_subcategories(&labels);
    }
    apply_nullable(&mut category.icon_name, dto.icon_name);
    apply_nullable(&mut category.color, dto.color);
    apply_nullable(&mut category.description, dto.description);
    apply_nullable(&mut category.background_image, dto.background_image);

    Ok(category)
}

/// Labels configured before an update that the updated category no longer offers
fn dropped_subcategories(before: &Category, after: &Category) -> Vec<String> {
    let kept = after.subcategory_list();
    before
        .subcategory_list()
        .into_iter()
        .filter(|label| !kept.contains(label))
        .collect()
}

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
    cache: Arc<CatalogCache>,
}

impl CategoryService {
    pub fn new(pool: PgPool, cache: Arc<CatalogCache>) -> Self {
        Self { pool, cache }
    }

    /// List all categories in display order
    pub async fn list(&self) -> Result<Vec<Category>> {
        if let Some(categories) = self.cache.categories.get().await {
            return Ok(categories);
        }

        let query = format!(
            "SELECT {} FROM categories ORDER BY order_position ASC, name ASC",
            CATEGORY_COLUMNS
        );
        let categories: Vec<Category> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })?;

        self.cache.categories.set(categories.clone()).await;
        Ok(categories)
    }

    /// Get category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Category> {
        self.list()
            .await?
            .into_iter()
            .find(|c| c.slug == slug)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    /// Get category by id (always from the database)
    pub async fn get_by_id(&self, id: Uuid) -> Result<Category> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category {}: {:?}", id, e);
                AppError::Database(e)
            })?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<Category> {
        let name = dto.name.trim().to_string();
        let slug = dto.slug.unwrap_or_else(|| slugify(&name));
        if slug.is_empty() {
            return Err(AppError::Validation(
                "Could not derive a slug from the name; provide one explicitly".to_string(),
            ));
        }

        let subcategories = dto
            .subcategories
            .as_deref()
            .and_then(join_subcategories);

        let query = format!(
            r#"
            INSERT INTO categories (name, slug, icon_name, color, order_position, show_on_home,
                                    subcategories, description, background_image)
            VALUES ($1, $2, $3, $4,
                    COALESCE($5, (SELECT COALESCE(MAX(order_position) + 1, 0) FROM categories)),
                    $6, $7, $8, $9)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let category: Category = sqlx::query_as(&query)
            .bind(&name)
            .bind(&slug)
            .bind(dto.icon_name)
            .bind(dto.color)
            .bind(dto.order_position)
            .bind(dto.show_on_home.unwrap_or(true))
            .bind(subcategories)
            .bind(dto.description)
            .bind(dto.background_image)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(e, "category"))?;

        self.cache.invalidate_all().await;
        tracing::info!("Created category {} ({})", category.slug, category.id);

        Ok(category)
    }

    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<Category> {
        let existing = self.get_by_id(id).await?;
        let updated = apply_update(existing.clone(), dto)?;
        let dropped = dropped_subcategories(&existing, &updated);

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let query = format!(
            r#"
            UPDATE categories
            SET name = $1, slug = $2, icon_name = $3, color = $4, order_position = $5,
                show_on_home = $6, subcategories = $7, description = $8,
                background_image = $9, updated_at = NOW()
            WHERE id = $10
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let category: Category = sqlx::query_as(&query)
            .bind(&updated.name)
            .bind(&updated.slug)
            .bind(&updated.icon_name)
            .bind(&updated.color)
            .bind(updated.order_position)
            .bind(updated.show_on_home)
            .bind(&updated.subcategories)
            .bind(&updated.description)
            .bind(&updated.background_image)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "category"))?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))?;

        if !dropped.is_empty() {
            let cleared = sqlx::query(
                r#"
                UPDATE links SET subcategory = NULL, updated_at = NOW()
                WHERE category_id = $1 AND subcategory = ANY($2)
                "#,
            )
            .bind(id)
            .bind(&dropped)
            .execute(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "link"))?;

            tracing::info!(
                "Removed subcategories {:?} from category {}; cleared {} link(s)",
                dropped,
                id,
                cleared.rows_affected()
            );
        }

        tx.commit().await.map_err(AppError::Database)?;
        self.cache.invalidate_all().await;
        Ok(category)
    }

    /// Delete a category. Its links stay, uncategorized and without a subcategory.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query(
            r#"
            UPDATE links SET subcategory = NULL, updated_at = NOW()
            WHERE category_id = $1 AND subcategory IS NOT NULL
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| handle_db_error(e, "link"))?;

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "category"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        tx.commit().await.map_err(AppError::Database)?;

        self.cache.invalidate_all().await;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }

    /// Delete every link in a category; returns the number removed
    pub async fn clear_links(&self, id: Uuid) -> Result<u64> {
        let category = self.get_by_id(id).await?;

        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let affected_tags: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT lt.tag_id
            FROM link_tags lt
            JOIN links l ON l.id = lt.link_id
            WHERE l.category_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM links WHERE category_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| handle_db_error(e, "link"))?;

        recount_usage(&mut *tx, &affected_tags).await?;
        tx.commit().await.map_err(AppError::Database)?;

        self.cache.invalidate_all().await;
        tracing::info!(
            "Cleared {} links from category {}",
            result.rows_affected(),
            category.slug
        );
        Ok(result.rows_affected())
    }

    /// Persist explicit positions
    pub async fn reorder(&self, positions: &[(Uuid, i32)]) -> Result<()> {
        persist_positions(&self.pool, PositionedTable::Categories, positions).await?;
        self.cache.invalidate_all().await;
        Ok(())
    }

    /// Move one category onto another's slot and renumber all of them
    pub async fn move_category(&self, active_id: Uuid, over_id: Uuid) -> Result<Vec<(Uuid, i32)>> {
        let ordered: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM categories ORDER BY order_position ASC, name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load category order: {:?}", e);
            AppError::Database(e)
        })?;

        let positions = move_by_id(&ordered, active_id, over_id)?;
        self.reorder(&positions).await?;
        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(slug: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: "This Week".to_string(),
            slug: slug.to_string(),
            icon_name: Some("calendar".to_string()),
            color: Some("#ff0000".to_string()),
            order_position: 3,
            show_on_home: true,
            subcategories: Some("Tools,News".to_string()),
            description: None,
            background_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_update_partial_fields() {
        let dto: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "name": " Weekly ",
            "color": null,
            "subcategories": ["Research"]
        }))
        .unwrap();

        let updated = apply_update(category("weekly"), dto).unwrap();
        assert_eq!(updated.name, "Weekly");
        assert_eq!(updated.color, None);
        assert_eq!(updated.icon_name.as_deref(), Some("calendar"));
        assert_eq!(updated.subcategories.as_deref(), Some("Research"));
        assert_eq!(updated.order_position, 3);
    }

    #[test]
    fn test_apply_update_empty_subcategories_clears() {
        let dto = UpdateCategoryDto {
            subcategories: Some(Vec::new()),
            ..Default::default()
        };
        let updated = apply_update(category("weekly"), dto).unwrap();
        assert!(updated.subcategories.is_none());
    }

    #[test]
    fn test_time_based_slug_is_locked() {
        let dto = UpdateCategoryDto {
            slug: Some("weekly".to_string()),
            ..Default::default()
        };
        let result = apply_update(category("this-week"), dto);
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Re-sending the same slug is fine
        let same = UpdateCategoryDto {
            slug: Some("this-week".to_string()),
            ..Default::default()
        };
        assert!(apply_update(category("this-week"), same).is_ok());
    }

    #[test]
    fn test_dropped_subcategories() {
        let before = category("ai");
        let dto: UpdateCategoryDto = serde_json::from_value(serde_json::json!({
            "subcategories": ["News", "Research"]
        }))
        .unwrap();
        let after = apply_update(before.clone(), dto).unwrap();
        assert_eq!(dropped_subcategories(&before, &after), vec!["Tools"]);

        let cleared = apply_update(
            before.clone(),
            serde_json::from_value(serde_json::json!({ "subcategories": [] })).unwrap(),
        )
        .unwrap();
        assert_eq!(dropped_subcategories(&before, &cleared), vec!["Tools", "News"]);

        let renamed = apply_update(
            before.clone(),
            serde_json::from_value(serde_json::json!({ "name": "AI" })).unwrap(),
        )
        .unwrap();
        assert!(dropped_subcategories(&before, &renamed).is_empty());
    }
}
