use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::shared::types::nullable;
use crate::shared::validation::{HEX_COLOR_REGEX, SLUG_REGEX};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon_name: Option<String>,
    pub color: Option<String>,
    pub order_position: i32,
    pub show_on_home: bool,
    pub subcategories: Vec<String>,
    pub description: Option<String>,
    pub background_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        let subcategories = c.subcategory_list();
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            icon_name: c.icon_name,
            color: c.color,
            order_position: c.order_position,
            show_on_home: c.show_on_home,
            subcategories,
            description: c.description,
            background_image: c.background_image,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Category fields embedded in link responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    /// Generated from the name when omitted
    #[validate(length(min = 1, max = 200), regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric segments separated by single hyphens"))]
    pub slug: Option<String>,

    #[validate(length(max = 100))]
    pub icon_name: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "color must be a hex color such as #3b82f6"))]
    pub color: Option<String>,

    /// Appended after the last category when omitted
    #[validate(range(min = 0))]
    pub order_position: Option<i32>,

    pub show_on_home: Option<bool>,

    #[validate(length(max = 50))]
    pub subcategories: Option<Vec<String>>,

    pub description: Option<String>,

    #[validate(url)]
    pub background_image: Option<String>,
}

/// Partial update. Clearable fields accept `null`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200), regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric segments separated by single hyphens"))]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub icon_name: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub color: Option<Option<String>>,

    #[validate(range(min = 0))]
    pub order_position: Option<i32>,

    pub show_on_home: Option<bool>,

    /// Replaces the whole list; an empty list clears it
    #[validate(length(max = 50))]
    pub subcategories: Option<Vec<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub background_image: Option<Option<String>>,
}

impl UpdateCategoryDto {
    /// Field checks the derive cannot express on clearable fields
    pub fn validate_clearable(&self) -> Result<(), String> {
        if let Some(Some(color)) = &self.color {
            if !HEX_COLOR_REGEX.is_match(color) {
                return Err("color must be a hex color such as #3b82f6".to_string());
            }
        }
        if let Some(Some(icon)) = &self.icon_name {
            if icon.len() > 100 {
                return Err("icon_name must be at most 100 characters".to_string());
            }
        }
        Ok(())
    }
}

/// Drop `active_id` onto the position currently held by `over_id`
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveCategoryDto {
    pub active_id: Uuid,
    pub over_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClearCategoryResponseDto {
    pub category_id: Uuid,
    pub deleted_links: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_validation() {
        let dto: CreateCategoryDto = serde_json::from_value(serde_json::json!({
            "name": "AI News",
            "color": "#112233",
            "subcategories": ["Tools", "Research"]
        }))
        .unwrap();
        assert!(dto.validate().is_ok());

        let bad: CreateCategoryDto = serde_json::from_value(serde_json::json!({
            "name": "AI News",
            "slug": "AI News"
        }))
        .unwrap();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_dto_clearable_color_checked() {
        let dto: UpdateCategoryDto =
            serde_json::from_value(serde_json::json!({ "color": "red" })).unwrap();
        assert!(dto.validate_clearable().is_err());

        let cleared: UpdateCategoryDto =
            serde_json::from_value(serde_json::json!({ "color": null })).unwrap();
        assert!(cleared.validate_clearable().is_ok());
        assert_eq!(cleared.color, Some(None));
    }
}
