use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Database model for link
#[derive(Debug, Clone, FromRow)]
pub struct Link {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub icon_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory: Option<String>,
    pub is_pinned: bool,
    pub is_active: bool,
    pub is_featured: bool,
    pub order_position: i32,
    pub click_count: i32,
    pub expiration_date: Option<DateTime<Utc>>,
    pub upvote_count: i32,
    pub downvote_count: i32,
    /// "healthy" / "unhealthy", set by the last health check
    pub health_status: Option<String>,
    pub last_health_check: Option<DateTime<Utc>>,
    pub preview_image: Option<String>,
    pub scheduled_publish_at: Option<DateTime<Utc>>,
    pub scheduled_unpublish_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link row joined with its category summary. Append WHERE / ORDER BY clauses.
pub const LINK_WITH_CATEGORY_SELECT: &str = r#"
    SELECT l.id, l.title, l.description, l.url, l.icon_name, l.category_id, l.subcategory,
           l.is_pinned, l.is_active, l.is_featured, l.order_position, l.click_count,
           l.expiration_date, l.upvote_count, l.downvote_count, l.health_status,
           l.last_health_check, l.preview_image, l.scheduled_publish_at,
           l.scheduled_unpublish_at, l.created_at, l.updated_at,
           c.name AS category_name, c.slug AS category_slug, c.color AS category_color
    FROM links l
    LEFT JOIN categories c ON c.id = l.category_id
"#;

impl Link {
    /// Active, not expired and inside its publishing window
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.expiration_date.is_none_or(|at| at > now)
            && self.scheduled_publish_at.is_none_or(|at| at <= now)
            && self.scheduled_unpublish_at.is_none_or(|at| at > now)
    }

    /// Hidden links are reported to the public as missing
    pub fn ensure_visible_at(&self, now: DateTime<Utc>) -> Result<()> {
        if self.is_visible_at(now) {
            Ok(())
        } else {
            Err(AppError::NotFound(format!(
                "Link with id {} not found",
                self.id
            )))
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct LinkWithCategory {
    #[sqlx(flatten)]
    pub link: Link,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    pub category_color: Option<String>,
}

impl LinkWithCategory {
    pub fn category_name_or_default(&self) -> &str {
        self.category_name.as_deref().unwrap_or("Uncategorized")
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn link(title: &str) -> Link {
        let now = Utc::now();
        Link {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            url: "https://example.com".to_string(),
            icon_name: None,
            category_id: None,
            subcategory: None,
            is_pinned: false,
            is_active: true,
            is_featured: false,
            order_position: 0,
            click_count: 0,
            expiration_date: None,
            upvote_count: 0,
            downvote_count: 0,
            health_status: None,
            last_health_check: None,
            preview_image: None,
            scheduled_publish_at: None,
            scheduled_unpublish_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_category(link: Link, name: &str, slug: &str) -> LinkWithCategory {
        LinkWithCategory {
            link,
            category_name: Some(name.to_string()),
            category_slug: Some(slug.to_string()),
            category_color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::link;
    use crate::core::error::AppError;
    use chrono::Duration;

    #[test]
    fn test_visibility_window() {
        let now = chrono::Utc::now();

        let visible = link("a");
        assert!(visible.is_visible_at(now));

        let mut inactive = link("b");
        inactive.is_active = false;
        assert!(!inactive.is_visible_at(now));

        let mut expired = link("c");
        expired.expiration_date = Some(now - Duration::minutes(1));
        assert!(!expired.is_visible_at(now));

        let mut expiring_later = link("d");
        expiring_later.expiration_date = Some(now + Duration::days(1));
        assert!(expiring_later.is_visible_at(now));

        let mut scheduled = link("e");
        scheduled.scheduled_publish_at = Some(now + Duration::hours(1));
        assert!(!scheduled.is_visible_at(now));
        assert!(scheduled.is_visible_at(now + Duration::hours(2)));

        let mut unpublished = link("f");
        unpublished.scheduled_unpublish_at = Some(now - Duration::hours(1));
        assert!(!unpublished.is_visible_at(now));
    }

    #[test]
    fn test_hidden_link_reads_as_missing() {
        let now = chrono::Utc::now();
        assert!(link("live").ensure_visible_at(now).is_ok());

        let mut inactive = link("off");
        inactive.is_active = false;
        assert!(matches!(
            inactive.ensure_visible_at(now),
            Err(AppError::NotFound(_))
        ));

        let mut scheduled = link("later");
        scheduled.scheduled_publish_at = Some(now + Duration::hours(2));
        assert!(matches!(
            scheduled.ensure_visible_at(now),
            Err(AppError::NotFound(_))
        ));

        let mut expired = link("gone");
        expired.expiration_date = Some(now - Duration::minutes(1));
        assert!(expired.ensure_visible_at(now).is_err());
    }
}
