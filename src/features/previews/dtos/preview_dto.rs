use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::previews::models::LinkPreview;

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkPreviewResponseDto {
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

impl From<LinkPreview> for LinkPreviewResponseDto {
    fn from(p: LinkPreview) -> Self {
        Self {
            id: p.id,
            link_id: p.link_id,
            og_title: p.og_title,
            og_description: p.og_description,
            og_image: p.og_image,
            og_type: p.og_type,
            og_site_name: p.og_site_name,
            twitter_card: p.twitter_card,
            twitter_title: p.twitter_title,
            twitter_description: p.twitter_description,
            twitter_image: p.twitter_image,
            preview_image: p.preview_image,
            fetched_at: p.fetched_at,
        }
    }
}
