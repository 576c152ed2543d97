use serde::Serialize;

use crate::core::error::{AppError, Result};
use crate::features::analytics::models::LinkAnalytics;
use crate::features::links::models::LinkWithCategory;

pub const LINK_CSV_HEADERS: [&str; 13] = [
    "Title",
    "URL",
    "Description",
    "Category",
    "Subcategory",
    "Clicks",
    "Upvotes",
    "Downvotes",
    "Pinned",
    "Featured",
    "Active",
    "Created At",
    "Health Status",
];

pub const ANALYTICS_CSV_HEADERS: [&str; 10] = [
    "Link ID",
    "Clicked At",
    "Device Type",
    "Browser",
    "OS",
    "Country",
    "Region",
    "City",
    "Referrer",
    "Session ID",
];

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// One exported link, fields in `LINK_CSV_HEADERS` order
#[derive(Debug, Serialize)]
pub struct LinkCsvRow {
    pub title: String,
    pub url: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub clicks: i32,
    pub upvotes: i32,
    pub downvotes: i32,
    pub pinned: &'static str,
    pub featured: &'static str,
    pub active: &'static str,
    pub created_at: String,
    pub health_status: String,
}

impl From<LinkWithCategory> for LinkCsvRow {
    fn from(row: LinkWithCategory) -> Self {
        let category = row.category_name_or_default().to_string();
        let link = row.link;
        Self {
            title: link.title,
            url: link.url,
            description: link.description.unwrap_or_default(),
            category,
            subcategory: link.subcategory.unwrap_or_default(),
            clicks: link.click_count,
            upvotes: link.upvote_count,
            downvotes: link.downvote_count,
            pinned: yes_no(link.is_pinned),
            featured: yes_no(link.is_featured),
            active: yes_no(link.is_active),
            created_at: link.created_at.to_rfc3339(),
            health_status: or_unknown(link.health_status),
        }
    }
}

/// One exported click, fields in `ANALYTICS_CSV_HEADERS` order
#[derive(Debug, Serialize)]
pub struct AnalyticsCsvRow {
    pub link_id: String,
    pub clicked_at: String,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub referrer: String,
    pub session_id: String,
}

impl From<LinkAnalytics> for AnalyticsCsvRow {
    fn from(a: LinkAnalytics) -> Self {
        Self {
            link_id: a.link_id.to_string(),
            clicked_at: a.clicked_at.to_rfc3339(),
            device_type: or_unknown(a.device_type),
            browser: or_unknown(a.browser),
            os: or_unknown(a.os),
            country: or_unknown(a.country),
            region: or_unknown(a.region),
            city: or_unknown(a.city),
            referrer: a
                .referrer
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "Direct".to_string()),
            session_id: or_unknown(a.session_id),
        }
    }
}

/// Header line plus one line per row. The header is written even with no rows.
pub fn write_csv<T: Serialize>(headers: &[&str], rows: impl IntoIterator<Item = T>) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .map_err(|e| AppError::Internal(format!("Failed to write CSV header: {}", e)))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| AppError::Internal(format!("Failed to write CSV row: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::links::models::link::fixtures;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_links_csv_has_header_plus_one_line_per_link() {
        let mut tools = fixtures::link("Hammer, Nails & Co");
        tools.description = Some("Says \"hello\"".to_string());
        let rows = vec![
            fixtures::with_category(tools, "Tools, Misc", "tools"),
            fixtures::with_category(fixtures::link("Blog"), "Writing", "writing"),
            LinkWithCategory {
                link: fixtures::link("Loose"),
                category_name: None,
                category_slug: None,
                category_color: None,
            },
        ];

        let csv = write_csv(&LINK_CSV_HEADERS, rows.into_iter().map(LinkCsvRow::from)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Title,URL,Description,Category"));
        assert!(lines[1].starts_with("\"Hammer, Nails & Co\","));
        assert!(lines[1].contains("\"Says \"\"hello\"\"\""));
        assert!(lines[1].contains("\"Tools, Misc\""));
        assert!(lines[3].contains(",Uncategorized,"));
        assert!(lines[3].ends_with(",Unknown"));
    }

    #[test]
    fn test_empty_export_still_has_header() {
        let csv = write_csv(&LINK_CSV_HEADERS, Vec::<LinkCsvRow>::new()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_flags_render_yes_no() {
        let mut link = fixtures::link("Pinned");
        link.is_pinned = true;
        link.is_featured = false;
        link.health_status = Some("healthy".to_string());
        let row = LinkCsvRow::from(fixtures::with_category(link, "News", "news"));

        assert_eq!(row.pinned, "Yes");
        assert_eq!(row.featured, "No");
        assert_eq!(row.active, "Yes");
        assert_eq!(row.health_status, "healthy");
    }

    #[test]
    fn test_analytics_row_defaults() {
        let click = LinkAnalytics {
            id: Uuid::new_v4(),
            link_id: Uuid::new_v4(),
            clicked_at: Utc::now(),
            device_type: Some("mobile".to_string()),
            browser: None,
            os: None,
            user_agent: None,
            referrer: None,
            country: None,
            region: None,
            city: None,
            session_id: Some("session_1_abc".to_string()),
        };
        let row = AnalyticsCsvRow::from(click);

        assert_eq!(row.device_type, "mobile");
        assert_eq!(row.browser, "Unknown");
        assert_eq!(row.referrer, "Direct");
        assert_eq!(row.session_id, "session_1_abc");

        let csv = write_csv(&ANALYTICS_CSV_HEADERS, [row]).unwrap();
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_multiline_field_is_quoted() {
        let mut link = fixtures::link("Notes");
        link.description = Some("line one\nline two".to_string());
        let csv = write_csv(
            &LINK_CSV_HEADERS,
            [LinkCsvRow::from(fixtures::with_category(link, "A", "a"))],
        )
        .unwrap();
        assert!(csv.contains("\"line one\nline two\""));
    }
}
