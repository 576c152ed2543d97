use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::links::dtos::LinkResponseDto;
use crate::features::links::models::LinkWithCategory;
use crate::features::pages::models::{CategoryGroup, CategoryPageLayout, HomeLayout};
use crate::features::tags::dtos::TagResponseDto;
use crate::features::tags::models::Tag;

fn to_dtos<T, D: From<T>>(items: Vec<T>) -> Vec<D> {
    items.into_iter().map(D::from).collect()
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct HomeQueryParams {
    /// Case-insensitive filter over title, description and category name
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CategoryPageQueryParams {
    /// Exact subcategory label
    pub subcategory: Option<String>,
    /// Case-insensitive filter over title, description and subcategory
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TagPageQueryParams {
    /// Case-insensitive filter over title and description
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryGroupDto {
    pub category: CategoryResponseDto,
    pub links: Vec<LinkResponseDto>,
}

impl From<CategoryGroup> for CategoryGroupDto {
    fn from(group: CategoryGroup) -> Self {
        Self {
            category: group.category.into(),
            links: to_dtos(group.links),
        }
    }
}

/// Sections of the home page, in display order
#[derive(Debug, Serialize, ToSchema)]
pub struct HomePageDto {
    pub pinned: Vec<LinkResponseDto>,
    pub featured: Vec<LinkResponseDto>,
    pub new_this_week: Vec<LinkResponseDto>,
    pub categories: Vec<CategoryGroupDto>,
    /// Only filled when searching
    pub matching_tags: Vec<TagResponseDto>,
}

impl From<HomeLayout> for HomePageDto {
    fn from(layout: HomeLayout) -> Self {
        Self {
            pinned: to_dtos(layout.pinned),
            featured: to_dtos(layout.featured),
            new_this_week: to_dtos(layout.new_this_week),
            categories: to_dtos(layout.groups),
            matching_tags: to_dtos(layout.matching_tags),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryPageDto {
    pub category: CategoryResponseDto,
    pub subcategories: Vec<String>,
    pub pinned: Vec<LinkResponseDto>,
    pub links: Vec<LinkResponseDto>,
}

impl From<CategoryPageLayout> for CategoryPageDto {
    fn from(page: CategoryPageLayout) -> Self {
        Self {
            category: page.category.into(),
            subcategories: page.subcategories,
            pinned: to_dtos(page.pinned),
            links: to_dtos(page.regular),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TagPageDto {
    pub tag: TagResponseDto,
    pub links: Vec<LinkResponseDto>,
}

impl TagPageDto {
    pub fn new(tag: Tag, links: Vec<LinkWithCategory>) -> Self {
        Self {
            tag: tag.into(),
            links: to_dtos(links),
        }
    }
}
