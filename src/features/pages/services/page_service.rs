use std::sync::Arc;

use chrono::Utc;

use crate::core::error::Result;
use crate::features::categories::services::CategoryService;
use crate::features::links::models::LinkWithCategory;
use crate::features::links::services::LinkService;
use crate::features::pages::models::{
    category_page, home_layout, tag_page, CategoryPageLayout, HomeLayout,
};
use crate::features::tags::models::Tag;
use crate::features::tags::services::TagService;

/// Composes the public home, category and tag pages
pub struct PageService {
    links: Arc<LinkService>,
    categories: Arc<CategoryService>,
    tags: Arc<TagService>,
}

impl PageService {
    pub fn new(
        links: Arc<LinkService>,
        categories: Arc<CategoryService>,
        tags: Arc<TagService>,
    ) -> Self {
        Self {
            links,
            categories,
            tags,
        }
    }

    pub async fn home(&self, search: Option<&str>) -> Result<HomeLayout> {
        let links = self.links.list_visible().await?;
        let categories = self.categories.list().await?;
        let tags = if search.is_some() {
            self.tags.list().await?
        } else {
            Vec::new()
        };

        Ok(home_layout(links, &categories, &tags, search, Utc::now()))
    }

    pub async fn category(
        &self,
        slug: &str,
        subcategory: Option<&str>,
        search: Option<&str>,
    ) -> Result<CategoryPageLayout> {
        let category = self.categories.get_by_slug(slug).await?;
        let links = self.links.list_visible().await?;
        Ok(category_page(category, links, subcategory, search))
    }

    pub async fn tag(
        &self,
        slug: &str,
        search: Option<&str>,
    ) -> Result<(Tag, Vec<LinkWithCategory>)> {
        let tag = self.tags.get_by_slug(slug).await?;
        let tagged = self.tags.link_ids_for_tag(tag.id).await?;
        let links = self.links.list_visible().await?;
        Ok((tag, tag_page(links, &tagged, search)))
    }
}
