use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::tags::models::Tag;
use crate::shared::types::nullable;
use crate::shared::validation::{HEX_COLOR_REGEX, SLUG_REGEX};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TagResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub description: Option<String>,
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Tag> for TagResponseDto {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
            slug: t.slug,
            color: t.color,
            description: t.description,
            usage_count: t.usage_count,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Generated from the name when omitted
    #[validate(length(min = 1, max = 100), regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric segments separated by single hyphens"))]
    pub slug: Option<String>,

    /// Defaults to #3b82f6
    #[validate(regex(path = *HEX_COLOR_REGEX, message = "color must be a hex color such as #3b82f6"))]
    pub color: Option<String>,

    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTagDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100), regex(path = *SLUG_REGEX, message = "slug must be lowercase alphanumeric segments separated by single hyphens"))]
    pub slug: Option<String>,

    #[validate(regex(path = *HEX_COLOR_REGEX, message = "color must be a hex color such as #3b82f6"))]
    pub color: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

/// Tag names to map onto existing tags, creating the missing ones
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResolveTagsDto {
    #[validate(length(min = 1, max = 100))]
    pub names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tag_rejects_bad_color() {
        let dto: CreateTagDto = serde_json::from_value(serde_json::json!({
            "name": "Rust",
            "color": "blue"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_tag_description_clear() {
        let dto: UpdateTagDto =
            serde_json::from_value(serde_json::json!({ "description": null })).unwrap();
        assert_eq!(dto.description, Some(None));
        assert!(dto.name.is_none());
    }
}
