pub mod analytics;
pub mod auth;
pub mod categories;
pub mod exports;
pub mod health_checks;
pub mod links;
pub mod pages;
pub mod previews;
pub mod sitemap;
pub mod tags;
pub mod votes;
