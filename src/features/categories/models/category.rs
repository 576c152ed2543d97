use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::constants::TIME_BASED_CATEGORY_SLUGS;

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub icon_name: Option<String>,
    pub color: Option<String>,
    pub order_position: i32,
    pub show_on_home: bool,
    /// Comma-joined subcategory labels, e.g. "Tools, Tutorials"
    pub subcategories: Option<String>,
    pub description: Option<String>,
    pub background_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const CATEGORY_COLUMNS: &str = "id, name, slug, icon_name, color, order_position, show_on_home, \
     subcategories, description, background_image, created_at, updated_at";

impl Category {
    pub fn subcategory_list(&self) -> Vec<String> {
        parse_subcategories(self.subcategories.as_deref())
    }

    /// Exact (case-sensitive) match against the configured labels
    pub fn has_subcategory(&self, subcategory: &str) -> bool {
        self.subcategory_list().iter().any(|s| s == subcategory)
    }

    /// "This Week" / "This Month" buckets keep their slug forever
    pub fn is_time_based(&self) -> bool {
        TIME_BASED_CATEGORY_SLUGS.contains(&self.slug.as_str())
    }
}

/// Split a comma-joined subcategory string, trimming and dropping empty labels
pub fn parse_subcategories(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join labels back into storage form. Duplicates are dropped, first occurrence wins.
pub fn join_subcategories(labels: &[String]) -> Option<String> {
    let mut unique: Vec<String> = Vec::new();
    for label in labels.iter().flat_map(|l| l.split(',')) {
        let label = label.trim();
        if !label.is_empty() && !unique.iter().any(|u| u == label) {
            unique.push(label.to_string());
        }
    }

    if unique.is_empty() {
        None
    } else {
        Some(unique.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(slug: &str, subcategories: Option<&str>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            slug: slug.to_string(),
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
    fn test_parse_subcategories() {
        assert_eq!(
            parse_subcategories(Some(" Tools, Tutorials ,,News ")),
            vec!["Tools", "Tutorials", "News"]
        );
        assert!(parse_subcategories(None).is_empty());
        assert!(parse_subcategories(Some(" , ")).is_empty());
    }

    #[test]
    fn test_join_subcategories() {
        let labels = vec![
            " Tools ".to_string(),
            "News,Tools".to_string(),
            "".to_string(),
        ];
        assert_eq!(join_subcategories(&labels).as_deref(), Some("Tools,News"));
        assert_eq!(join_subcategories(&[]), None);
    }

    #[test]
    fn test_has_subcategory_is_exact() {
        let c = category("ai", Some("Tools, Research"));
        assert!(c.has_subcategory("Tools"));
        assert!(!c.has_subcategory("tools"));
        assert!(!c.has_subcategory("Tool"));
    }

    #[test]
    fn test_time_based_slugs() {
        assert!(category("this-week", None).is_time_based());
        assert!(category("this-month", None).is_time_based());
        assert!(!category("this-year", None).is_time_based());
    }
}
