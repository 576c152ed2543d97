pub mod page_dto;

pub use page_dto::{
    CategoryGroupDto, CategoryPageDto, CategoryPageQueryParams, HomePageDto, HomeQueryParams,
    TagPageDto, TagPageQueryParams,
};
