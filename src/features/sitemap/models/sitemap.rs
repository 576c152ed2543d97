use std::sync::OnceLock;

use chrono::NaiveDate;
use minijinja::{context, AutoEscape, Environment};
use serde::Serialize;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::Category;
use crate::features::tags::models::Tag;

const TEMPLATE_NAME: &str = "sitemap.xml";
const SITEMAP_TEMPLATE: &str = include_str!("../../../../templates/sitemap.xml.jinja");

static SITEMAP_ENV: OnceLock<Environment<'static>> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

/// Escape the five XML special characters
fn xml_escape(value: String) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn environment() -> &'static Environment<'static> {
    SITEMAP_ENV.get_or_init(|| {
        let mut env = Environment::new();
        // No auto-escaping: values go through the `xml` filter explicitly
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.add_filter("xml", xml_escape);
        if let Err(e) = env.add_template(TEMPLATE_NAME, SITEMAP_TEMPLATE) {
            tracing::error!("Failed to load sitemap template: {}", e);
        }
        env
    })
}

/// Home page, then every category, then every tag in use
pub fn build_entries(
    base_url: &str,
    today: NaiveDate,
    categories: &[Category],
    tags: &[Tag],
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let date = |d: NaiveDate| Some(d.format("%Y-%m-%d").to_string());

    let mut entries = vec![SitemapEntry {
        loc: format!("{}/", base),
        lastmod: date(today),
        changefreq: "daily",
        priority: "1.0",
    }];

    entries.extend(categories.iter().map(|c| SitemapEntry {
        loc: format!("{}/category/{}", base, urlencoding::encode(&c.slug)),
        lastmod: date(c.updated_at.date_naive()),
        changefreq: "weekly",
        priority: "0.8",
    }));

    entries.extend(
        tags.iter()
            .filter(|t| t.usage_count > 0)
            .map(|t| SitemapEntry {
                loc: format!("{}/tag/{}", base, urlencoding::encode(&t.slug)),
                lastmod: date(t.updated_at.date_naive()),
                changefreq: "weekly",
                priority: "0.6",
            }),
    );

    entries
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String> {
    let template = environment()
        .get_template(TEMPLATE_NAME)
        .map_err(|e| AppError::Internal(format!("Sitemap template unavailable: {}", e)))?;

    template
        .render(context! { entries => entries })
        .map_err(|e| AppError::Internal(format!("Failed to render sitemap: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn category(slug: &str) -> Category {
        let updated = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
        Category {
            id: Uuid::new_v4(),
            name: slug.to_string(),
            slug: slug.to_string(),
            icon_name: None,
            color: None,
            order_position: 0,
            show_on_home: true,
            subcategories: None,
            description: None,
            background_image: None,
            created_at: updated,
            updated_at: updated,
        }
    }

    fn tag(slug: &str, usage_count: i32) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: slug.to_string(),
            slug: slug.to_string(),
            color: "#3b82f6".to_string(),
            description: None,
            usage_count,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_entries_cover_home_categories_and_used_tags() {
        let entries = build_entries(
            "https://links.example.com/",
            today(),
            &[category("ai-news"), category("tools")],
            &[tag("rust", 3), tag("unused", 0)],
        );

        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            vec![
                "https://links.example.com/",
                "https://links.example.com/category/ai-news",
                "https://links.example.com/category/tools",
                "https://links.example.com/tag/rust",
            ]
        );
        assert_eq!(entries[0].changefreq, "daily");
        assert_eq!(entries[0].priority, "1.0");
        assert_eq!(entries[1].lastmod.as_deref(), Some("2025-03-14"));
        assert_eq!(entries[1].priority, "0.8");
        assert_eq!(entries[3].priority, "0.6");
    }

    #[test]
    fn test_rendered_xml() {
        let entries = build_entries(
            "https://links.example.com",
            today(),
            &[category("tools")],
            &[],
        );
        let xml = render_sitemap(&entries).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://links.example.com/category/tools</loc>"));
        assert!(xml.contains("<lastmod>2025-06-01</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_loc_is_xml_escaped() {
        let entries = vec![SitemapEntry {
            loc: "https://example.com/?a=1&b=<2>".to_string(),
            lastmod: None,
            changefreq: "daily",
            priority: "1.0",
        }];
        let xml = render_sitemap(&entries).unwrap();
        assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=&lt;2&gt;</loc>"));
        assert!(!xml.contains("<lastmod>"));
    }
}
