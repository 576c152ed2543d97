use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Stored Open Graph / Twitter card metadata of a link's page
#[derive(Debug, Clone, FromRow)]
pub struct LinkPreview {
    pub id: Uuid,
    pub link_id: Uuid,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_image: Option<String>,
    pub og_type: Option<String>,
    pub og_site_name: Option<String>,
    pub twitter_card: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<String>,
    pub preview_image: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

pub const LINK_PREVIEW_COLUMNS: &str = "id, link_id, og_title, og_description, og_image, og_type, \
     og_site_name, twitter_card, twitter_title, twitter_description, twitter_image, \
     preview_image, fetched_at";
