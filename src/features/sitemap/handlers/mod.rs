pub mod sitemap_handler;

pub use sitemap_handler::*;
