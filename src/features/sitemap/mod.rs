//! `GET /sitemap.xml`: the home page, every category page and every tag page
//! whose tag is in use. Link targets are external and are left out.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::SitemapService;
