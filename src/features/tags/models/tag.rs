use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::shared::validation::slugify;

/// Database model for tag
#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub description: Option<String>,
    pub usage_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const TAG_COLUMNS: &str =
    "id, name, slug, color, description, usage_count, created_at, updated_at";

/// Case-insensitive name lookup over an already loaded tag list
pub fn find_by_name_ci<'a>(tags: &'a [Tag], name: &str) -> Option<&'a Tag> {
    let needle = name.trim().to_lowercase();
    tags.iter().find(|t| t.name.to_lowercase() == needle)
}

/// Every non-blank name must yield a slug, or no tag can be created for it
pub fn validate_tag_names(names: &[String]) -> Result<()> {
    match names
        .iter()
        .map(|n| n.trim())
        .find(|n| !n.is_empty() && slugify(n).is_empty())
    {
        Some(name) => Err(AppError::Validation(format!(
            "Tag name '{}' does not produce a valid slug",
            name
        ))),
        None => Ok(()),
    }
}

/// Requested ids absent from `found`, in request order
pub fn missing_tag_ids(requested: &[Uuid], found: &[Uuid]) -> Vec<Uuid> {
    let mut missing: Vec<Uuid> = Vec::new();
    for id in requested {
        if !found.contains(id) && !missing.contains(id) {
            missing.push(*id);
        }
    }
    missing
}

/// Tags whose name or description contains `term` (case-insensitive), at most `limit`
pub fn matching_tags(tags: &[Tag], term: &str, limit: usize) -> Vec<Tag> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    tags.iter()
        .filter(|t| {
            t.name.to_lowercase().contains(&needle)
                || t.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .take(limit)
        .cloned()
        .collect()
}

/// Changes needed to turn one tag set into another
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub to_add: Vec<Uuid>,
    pub to_remove: Vec<Uuid>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Every tag whose usage count may change
    pub fn touched(&self) -> Vec<Uuid> {
        self.to_add
            .iter()
            .chain(self.to_remove.iter())
            .copied()
            .collect()
    }
}

pub fn diff_tag_sets(current: &[Uuid], desired: &[Uuid]) -> TagDiff {
    let mut to_add: Vec<Uuid> = Vec::new();
    for id in desired {
        if !current.contains(id) && !to_add.contains(id) {
            to_add.push(*id);
        }
    }

    let to_remove = current
        .iter()
        .filter(|id| !desired.contains(id))
        .copied()
        .collect();

    TagDiff { to_add, to_remove }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, description: Option<&str>) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: crate::shared::validation::slugify(name),
            color: "#3b82f6".to_string(),
            description: description.map(str::to_string),
            usage_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let tags = vec![tag("Rust", None), tag("Machine Learning", None)];

        let found = find_by_name_ci(&tags, "  machine learning ").unwrap();
        assert_eq!(found.id, tags[1].id);
        assert_eq!(find_by_name_ci(&tags, "RUST").unwrap().id, tags[0].id);
        assert!(find_by_name_ci(&tags, "Go").is_none());
    }

    #[test]
    fn test_matching_tags_checks_description_and_limit() {
        let tags = vec![
            tag("Rust", Some("Systems language")),
            tag("Go", Some("Another systems language")),
            tag("Design", None),
        ];

        let found = matching_tags(&tags, "SYSTEMS", 5);
        assert_eq!(found.len(), 2);

        assert_eq!(matching_tags(&tags, "systems", 1).len(), 1);
        assert!(matching_tags(&tags, "   ", 5).is_empty());
    }

    #[test]
    fn test_validate_tag_names() {
        let ok = vec!["Rust".to_string(), "  ".to_string(), "Machine Learning".to_string()];
        assert!(validate_tag_names(&ok).is_ok());

        let bad = vec!["Rust".to_string(), " !!! ".to_string()];
        assert!(matches!(
            validate_tag_names(&bad),
            Err(AppError::Validation(msg)) if msg.contains("!!!")
        ));
    }

    #[test]
    fn test_missing_tag_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let unknown = Uuid::new_v4();

        assert!(missing_tag_ids(&[a, b], &[b, a]).is_empty());
        assert_eq!(missing_tag_ids(&[a, unknown, unknown], &[a]), vec![unknown]);
        assert!(missing_tag_ids(&[], &[a]).is_empty());
    }

    #[test]
    fn test_diff_tag_sets() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let diff = diff_tag_sets(&[a, b], &[b, c, c]);
        assert_eq!(diff.to_add, vec![c]);
        assert_eq!(diff.to_remove, vec![a]);
        assert_eq!(diff.touched().len(), 2);

        assert!(diff_tag_sets(&[a, b], &[b, a]).is_empty());
    }
}
