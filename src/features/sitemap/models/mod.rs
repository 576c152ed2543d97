pub mod sitemap;

pub use sitemap::{build_entries, render_sitemap};
