use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::links::models::{detect_platform, LinkWithCategory};
use crate::shared::types::nullable;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlatformDto {
    pub name: String,
    pub icon: String,
}

/// Response DTO for link
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LinkResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub icon_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub category: Option<CategorySummaryDto>,
    pub subcategory: Option<String>,
    pub is_pinned: bool,
    pub is_active: bool,
    pub is_featured: bool,
    pub order_position: i32,
    pub click_count: i32,
    pub expiration_date: Option<DateTime<Utc>>,
    pub upvote_count: i32,
    pub downvote_count: i32,
    pub health_status: Option<String>,
    pub last_health_check: Option<DateTime<Utc>>,
    pub preview_image: Option<String>,
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    pub scheduled_unpublish_at: Option<DateTime<Utc>>,
    /// Social network detected from the URL host
    pub platform: Option<PlatformDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LinkWithCategory> for LinkResponseDto {
    fn from(row: LinkWithCategory) -> Self {
        let category = match (row.link.category_id, row.category_name, row.category_slug) {
            (Some(id), Some(name), Some(slug)) => Some(CategorySummaryDto {
                id,
                name,
                slug,
                color: row.category_color,
            }),
            _ => None,
        };
        let platform = detect_platform(&row.link.url).map(|p| PlatformDto {
            name: p.name.to_string(),
            icon: p.icon.to_string(),
        });

        let link = row.link;
        Self {
            id: link.id,
            title: link.title,
            description: link.description,
            url: link.url,
            icon_name: link.icon_name,
            category_id: link.category_id,
            category,
            subcategory: link.subcategory,
            is_pinned: link.is_pinned,
            is_active: link.is_active,
            is_featured: link.is_featured,
            order_position: link.order_position,
            click_count: link.click_count,
            expiration_date: link.expiration_date,
            upvote_count: link.upvote_count,
            downvote_count: link.downvote_count,
            health_status: link.health_status,
            last_health_check: link.last_health_check,
            preview_image: link.preview_image,
            scheduled_publish_at: link.scheduled_publish_at,
            scheduled_unpublish_at: link.scheduled_unpublish_at,
            platform,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLinkDto {
    #[validate(length(min = 1, max = 300))]
    pub title: String,

    #[validate(url)]
    pub url: String,

    pub description: Option<String>,

    #[validate(length(max = 100))]
    pub icon_name: Option<String>,

    pub category_id: Option<Uuid>,

    /// Must be one of the category's subcategories
    #[validate(length(max = 200))]
    pub subcategory: Option<String>,

    pub is_pinned: Option<bool>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,

    /// Appended after the last link of the category when omitted
    #[validate(range(min = 0))]
    pub order_position: Option<i32>,

    pub expiration_date: Option<DateTime<Utc>>,
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    pub scheduled_unpublish_at: Option<DateTime<Utc>>,

    /// Existing tags to attach
    pub tag_ids: Option<Vec<Uuid>>,

    /// Tag names, reused case-insensitively or created
    #[validate(length(max = 50))]
    pub tag_names: Option<Vec<String>>,
}

/// Partial update. Clearable fields accept `null`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLinkDto {
    #[validate(length(min = 1, max = 300))]
    pub title: Option<String>,

    #[validate(url)]
    pub url: Option<String>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub icon_name: Option<Option<String>>,

    /// Moving to another category without a `subcategory` clears the subcategory
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub category_id: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub subcategory: Option<Option<String>>,

    pub is_pinned: Option<bool>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,

    #[validate(range(min = 0))]
    pub order_position: Option<i32>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub expiration_date: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_publish_at: Option<Option<DateTime<Utc>>>,

    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub scheduled_unpublish_at: Option<Option<DateTime<Utc>>>,

    /// When either tag field is present the link's tags are replaced
    pub tag_ids: Option<Vec<Uuid>>,

    #[validate(length(max = 50))]
    pub tag_names: Option<Vec<String>>,
}

impl UpdateLinkDto {
    pub fn touches_tags(&self) -> bool {
        self.tag_ids.is_some() || self.tag_names.is_some()
    }
}

/// Drop `active_id` onto `over_id` within the active link's category
#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveLinkDto {
    pub active_id: Uuid,
    pub over_id: Uuid,
    /// Narrow the ordering to one subcategory
    pub subcategory: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SyncLinkTagsDto {
    #[validate(length(max = 100))]
    pub tag_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddLinkTagDto {
    pub tag_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::links::models::link::fixtures::{link, with_category};

    #[test]
    fn test_response_embeds_category_and_platform() {
        let mut l = link("GitHub profile");
        l.url = "https://github.com/someone".to_string();
        l.category_id = Some(Uuid::new_v4());

        let dto = LinkResponseDto::from(with_category(l, "Code", "code"));
        assert_eq!(dto.category.as_ref().map(|c| c.slug.as_str()), Some("code"));
        assert_eq!(dto.platform.as_ref().map(|p| p.name.as_str()), Some("GitHub"));
    }

    #[test]
    fn test_uncategorized_response() {
        let dto = LinkResponseDto::from(LinkWithCategory {
            link: link("Plain"),
            category_name: None,
            category_slug: None,
            category_color: None,
        });
        assert!(dto.category.is_none());
        assert!(dto.platform.is_none());
    }

    #[test]
    fn test_create_link_requires_valid_url() {
        let dto: CreateLinkDto = serde_json::from_value(serde_json::json!({
            "title": "Broken",
            "url": "not a url"
        }))
        .unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_link_tags_flag() {
        let dto: UpdateLinkDto =
            serde_json::from_value(serde_json::json!({ "tag_names": [] })).unwrap();
        assert!(dto.touches_tags());
        assert!(!UpdateLinkDto::default().touches_tags());
    }
}
