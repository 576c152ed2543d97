pub mod layout;

pub use layout::{
    category_page, home_layout, tag_page, CategoryGroup, CategoryPageLayout, HomeLayout,
};
