use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One recorded click on a link
#[derive(Debug, Clone, FromRow)]
pub struct LinkAnalytics {
    pub id: Uuid,
    pub link_id: Uuid,
    pub clicked_at: DateTime<Utc>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub session_id: Option<String>,
}

pub const ANALYTICS_COLUMNS: &str = "id, link_id, clicked_at, device_type, browser, os, \
    user_agent, referrer, country, region, city, session_id";

/// Clicks grouped by the `analytics_session_id` cookie
#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsSession {
    pub id: Uuid,
    pub session_id: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub total_clicks: i32,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub referrer: Option<String>,
}

pub const SESSION_COLUMNS: &str = "id, session_id, first_seen_at, last_seen_at, total_clicks, \
    device_type, browser, os, referrer";
