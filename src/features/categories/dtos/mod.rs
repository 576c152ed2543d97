pub mod category_dto;

pub use category_dto::{
    CategoryResponseDto, CategorySummaryDto, ClearCategoryResponseDto, CreateCategoryDto,
    MoveCategoryDto, UpdateCategoryDto,
};
