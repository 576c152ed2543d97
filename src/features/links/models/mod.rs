pub mod link;
pub mod platform;

pub use link::{Link, LinkWithCategory, LINK_WITH_CATEGORY_SELECT};
pub use platform::detect_platform;
