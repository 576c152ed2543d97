//! Presentation order of the public pages.
//!
//! Everything here works on the already loaded, already visibility-filtered
//! link list; there is no pagination.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::links::models::LinkWithCategory;
use crate::features::tags::models::{matching_tags, Tag};
use crate::shared::constants::{MATCHING_TAGS_LIMIT, NEW_LINKS_LIMIT, NEW_LINK_WINDOW_DAYS};

#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub category: Category,
    pub links: Vec<LinkWithCategory>,
}

#[derive(Debug, Clone, Default)]
pub struct HomeLayout {
    pub pinned: Vec<LinkWithCategory>,
    pub featured: Vec<LinkWithCategory>,
    pub new_this_week: Vec<LinkWithCategory>,
    pub groups: Vec<CategoryGroup>,
    pub matching_tags: Vec<Tag>,
}

#[derive(Debug, Clone)]
pub struct CategoryPageLayout {
    pub category: Category,
    pub subcategories: Vec<String>,
    pub pinned: Vec<LinkWithCategory>,
    pub regular: Vec<LinkWithCategory>,
}

/// Trimmed, lowercased search term; `None` when blank
pub fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

fn contains(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

fn newest_first(a: &LinkWithCategory, b: &LinkWithCategory) -> Ordering {
    b.link.created_at.cmp(&a.link.created_at)
}

fn most_clicked_first(a: &LinkWithCategory, b: &LinkWithCategory) -> Ordering {
    b.link.click_count.cmp(&a.link.click_count)
}

pub fn home_layout(
    links: Vec<LinkWithCategory>,
    categories: &[Category],
    tags: &[Tag],
    search: Option<&str>,
    now: DateTime<Utc>,
) -> HomeLayout {
    let search = normalize_search(search);
    let links: Vec<LinkWithCategory> = match &search {
        Some(needle) => links
            .into_iter()
            .filter(|row| {
                contains(Some(&row.link.title), needle)
                    || contains(row.link.description.as_deref(), needle)
                    || contains(row.category_name.as_deref(), needle)
            })
            .collect(),
        None => links,
    };

    let mut pinned: Vec<LinkWithCategory> =
        links.iter().filter(|r| r.link.is_pinned).cloned().collect();
    pinned.sort_by(newest_first);

    let mut featured: Vec<LinkWithCategory> = links
        .iter()
        .filter(|r| r.link.is_featured && !r.link.is_pinned)
        .cloned()
        .collect();
    featured.sort_by(newest_first);

    let week_ago = now - Duration::days(NEW_LINK_WINDOW_DAYS);
    let mut new_this_week: Vec<LinkWithCategory> = links
        .iter()
        .filter(|r| !r.link.is_pinned && r.link.created_at >= week_ago)
        .cloned()
        .collect();
    new_this_week.sort_by(newest_first);
    new_this_week.truncate(NEW_LINKS_LIMIT);

    let mut ordered_categories: Vec<&Category> = categories.iter().collect();
    ordered_categories.sort_by_key(|c| c.order_position);

    let groups = ordered_categories
        .into_iter()
        .map(|category| {
            let mut group_links: Vec<LinkWithCategory> = links
                .iter()
                .filter(|r| r.link.category_id == Some(category.id) && !r.link.is_pinned)
                .cloned()
                .collect();
            group_links.sort_by(|a, b| {
                newest_first(a, b)
                    .then_with(|| most_clicked_first(a, b))
                    .then_with(|| a.link.order_position.cmp(&b.link.order_position))
            });
            CategoryGroup {
                category: category.clone(),
                links: group_links,
            }
        })
        .collect();

    let tag_matches = search
        .as_deref()
        .map(|needle| matching_tags(tags, needle, MATCHING_TAGS_LIMIT))
        .unwrap_or_default();

    HomeLayout {
        pinned,
        featured,
        new_this_week,
        groups,
        matching_tags: tag_matches,
    }
}

/// Links of one category, narrowed by subcategory then search.
///
/// The subcategory filter is an exact string match.
pub fn category_page(
    category: Category,
    links: Vec<LinkWithCategory>,
    subcategory: Option<&str>,
    search: Option<&str>,
) -> CategoryPageLayout {
    let search = normalize_search(search);
    let subcategory = subcategory.filter(|s| !s.is_empty());

    let (mut pinned, mut regular): (Vec<LinkWithCategory>, Vec<LinkWithCategory>) = links
        .into_iter()
        .filter(|r| r.link.category_id == Some(category.id))
        .filter(|r| subcategory.is_none_or(|s| r.link.subcategory.as_deref() == Some(s)))
        .filter(|r| match &search {
            Some(needle) => {
                contains(Some(&r.link.title), needle)
                    || contains(r.link.description.as_deref(), needle)
                    || contains(r.link.subcategory.as_deref(), needle)
            }
            None => true,
        })
        .partition(|r| r.link.is_pinned);

    pinned.sort_by(most_clicked_first);
    regular.sort_by(|a, b| {
        most_clicked_first(a, b).then_with(|| a.link.order_position.cmp(&b.link.order_position))
    });

    CategoryPageLayout {
        subcategories: category.subcategory_list(),
        category,
        pinned,
        regular,
    }
}

/// Links carrying a tag: pinned first, then most clicked, then newest
pub fn tag_page(
    links: Vec<LinkWithCategory>,
    tagged: &[Uuid],
    search: Option<&str>,
) -> Vec<LinkWithCategory> {
    let search = normalize_search(search);

    let mut rows: Vec<LinkWithCategory> = links
        .into_iter()
        .filter(|r| tagged.contains(&r.link.id))
        .filter(|r| match &search {
            Some(needle) => {
                contains(Some(&r.link.title), needle)
                    || contains(r.link.description.as_deref(), needle)
            }
            None => true,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.link
            .is_pinned
            .cmp(&a.link.is_pinned)
            .then_with(|| most_clicked_first(a, b))
            .then_with(|| newest_first(a, b))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::links::models::link::fixtures::{link, with_category};
    use fake::faker::company::en::CompanyName;
    use fake::Fake;

    fn category(name: &str, order_position: i32) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            icon_name: None,
            color: None,
            order_position,
            show_on_home: true,
            subcategories: Some("Tools,Research".to_string()),
            description: None,
            background_image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn in_category(category: &Category, days_old: i64) -> LinkWithCategory {
        let mut l = link(&CompanyName().fake::<String>());
        l.category_id = Some(category.id);
        l.click_count = (0..500).fake();
        l.created_at = Utc::now() - Duration::days(days_old);
        with_category(l, &category.name, &category.slug)
    }

    fn tag(name: &str) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            color: "#3b82f6".to_string(),
            description: None,
            usage_count: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_pinned_links_never_repeat_elsewhere() {
        let news = category("News", 0);
        let mut links: Vec<LinkWithCategory> = (0..20).map(|i| in_category(&news, i)).collect();
        for row in links.iter_mut().step_by(3) {
            row.link.is_pinned = true;
            row.link.is_featured = true;
        }

        let layout = home_layout(links, std::slice::from_ref(&news), &[], None, Utc::now());
        let pinned: Vec<Uuid> = layout.pinned.iter().map(|r| r.link.id).collect();

        assert_eq!(pinned.len(), 7);
        let elsewhere = layout
            .featured
            .iter()
            .chain(layout.new_this_week.iter())
            .chain(layout.groups.iter().flat_map(|g| g.links.iter()));
        for row in elsewhere {
            assert!(!pinned.contains(&row.link.id));
        }
    }

    #[test]
    fn test_sections_newest_first() {
        let news = category("News", 0);
        let links: Vec<LinkWithCategory> = [5, 1, 3].iter().map(|d| in_category(&news, *d)).collect();

        let layout = home_layout(links, std::slice::from_ref(&news), &[], None, Utc::now());
        let group = &layout.groups[0].links;
        assert!(group
            .windows(2)
            .all(|w| w[0].link.created_at >= w[1].link.created_at));
        assert_eq!(layout.new_this_week.len(), 3);
    }

    #[test]
    fn test_new_this_week_window_and_limit() {
        let news = category("News", 0);
        let mut links: Vec<LinkWithCategory> = (0..12).map(|_| in_category(&news, 1)).collect();
        links.push(in_category(&news, 30));

        let layout = home_layout(links, std::slice::from_ref(&news), &[], None, Utc::now());
        assert_eq!(layout.new_this_week.len(), NEW_LINKS_LIMIT);
        assert_eq!(layout.groups[0].links.len(), 13);
    }

    #[test]
    fn test_empty_categories_still_listed_in_order() {
        let tools = category("Tools", 2);
        let news = category("News", 0);
        let empty = category("Empty", 1);
        let links = vec![in_category(&tools, 0), in_category(&news, 0)];

        let layout = home_layout(
            links,
            &[tools.clone(), news.clone(), empty.clone()],
            &[],
            None,
            Utc::now(),
        );
        let names: Vec<&str> = layout.groups.iter().map(|g| g.category.name.as_str()).collect();
        assert_eq!(names, vec!["News", "Empty", "Tools"]);
        assert!(layout.groups[1].links.is_empty());
    }

    #[test]
    fn test_search_narrows_sections_and_matches_tags() {
        let news = category("News", 0);
        let mut rust = in_category(&news, 0);
        rust.link.title = "Learning Rust".to_string();
        let mut other = in_category(&news, 0);
        other.link.title = "Cooking".to_string();
        other.link.description = None;

        let tags = vec![tag("rust"), tag("cooking"), tag("Rustacean")];
        let layout = home_layout(
            vec![rust, other],
            std::slice::from_ref(&news),
            &tags,
            Some("  RUST "),
            Utc::now(),
        );

        assert_eq!(layout.groups[0].links.len(), 1);
        assert_eq!(layout.groups[0].links[0].link.title, "Learning Rust");
        let tag_names: Vec<&str> = layout.matching_tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(tag_names, vec!["rust", "Rustacean"]);
    }

    #[test]
    fn test_search_matches_category_name() {
        let news = category("News", 0);
        let layout = home_layout(
            vec![in_category(&news, 0)],
            std::slice::from_ref(&news),
            &[],
            Some("news"),
            Utc::now(),
        );
        assert_eq!(layout.groups[0].links.len(), 1);
        assert!(layout.matching_tags.is_empty());
    }

    #[test]
    fn test_category_page_subcategory_is_exact() {
        let ai = category("AI", 0);
        let other = category("Other", 1);
        let mut tools = in_category(&ai, 0);
        tools.link.subcategory = Some("Tools".to_string());
        let mut tools_lower = in_category(&ai, 0);
        tools_lower.link.subcategory = Some("tools".to_string());
        let mut research = in_category(&ai, 0);
        research.link.subcategory = Some("Research".to_string());
        let foreign = in_category(&other, 0);

        let page = category_page(
            ai.clone(),
            vec![tools.clone(), tools_lower, research, foreign],
            Some("Tools"),
            None,
        );

        let ids: Vec<Uuid> = page
            .pinned
            .iter()
            .chain(page.regular.iter())
            .map(|r| r.link.id)
            .collect();
        assert_eq!(ids, vec![tools.link.id]);
        assert_eq!(page.subcategories, vec!["Tools", "Research"]);
    }

    #[test]
    fn test_category_page_splits_and_sorts() {
        let ai = category("AI", 0);
        let mut a = in_category(&ai, 0);
        a.link.click_count = 5;
        a.link.order_position = 2;
        let mut b = in_category(&ai, 0);
        b.link.click_count = 5;
        b.link.order_position = 1;
        let mut c = in_category(&ai, 0);
        c.link.click_count = 50;
        let mut pinned = in_category(&ai, 0);
        pinned.link.is_pinned = true;

        let page = category_page(ai, vec![a.clone(), b.clone(), c.clone(), pinned], None, None);

        assert_eq!(page.pinned.len(), 1);
        let order: Vec<Uuid> = page.regular.iter().map(|r| r.link.id).collect();
        assert_eq!(order, vec![c.link.id, b.link.id, a.link.id]);
    }

    #[test]
    fn test_category_page_search_covers_subcategory() {
        let ai = category("AI", 0);
        let mut tools = in_category(&ai, 0);
        tools.link.title = "Alpha".to_string();
        tools.link.subcategory = Some("Tools".to_string());
        let mut beta = in_category(&ai, 0);
        beta.link.title = "Beta".to_string();

        let page = category_page(ai, vec![tools, beta], None, Some("tool"));
        assert_eq!(page.regular.len(), 1);
        assert_eq!(page.regular[0].link.title, "Alpha");
    }

    #[test]
    fn test_tag_page_order() {
        let news = category("News", 0);
        let mut popular = in_category(&news, 3);
        popular.link.click_count = 100;
        let mut pinned = in_category(&news, 3);
        pinned.link.click_count = 0;
        pinned.link.is_pinned = true;
        let mut newer = in_category(&news, 1);
        newer.link.click_count = 10;
        let mut older = in_category(&news, 2);
        older.link.click_count = 10;
        let untagged = in_category(&news, 0);

        let tagged = vec![popular.link.id, pinned.link.id, newer.link.id, older.link.id];
        let rows = tag_page(
            vec![older.clone(), untagged, newer.clone(), pinned.clone(), popular.clone()],
            &tagged,
            None,
        );

        let order: Vec<Uuid> = rows.iter().map(|r| r.link.id).collect();
        assert_eq!(
            order,
            vec![pinned.link.id, popular.link.id, newer.link.id, older.link.id]
        );
    }
}
