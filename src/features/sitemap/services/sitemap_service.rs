use std::sync::Arc;

use chrono::Utc;

use crate::core::error::Result;
use crate::features::categories::services::CategoryService;
use crate::features::sitemap::models::{build_entries, render_sitemap};
use crate::features::tags::services::TagService;

pub struct SitemapService {
    categories: Arc<CategoryService>,
    tags: Arc<TagService>,
    base_url: String,
}

impl SitemapService {
    pub fn new(categories: Arc<CategoryService>, tags: Arc<TagService>, base_url: String) -> Self {
        Self {
            categories,
            tags,
            base_url,
        }
    }

    pub async fn render(&self) -> Result<String> {
        let categories = self.categories.list().await?;
        let tags = self.tags.list().await?;
        let entries = build_entries(
            &self.base_url,
            Utc::now().date_naive(),
            &categories,
            &tags,
        );
        render_sitemap(&entries)
    }
}
