pub mod category;

pub use category::{join_subcategories, Category, CATEGORY_COLUMNS};
