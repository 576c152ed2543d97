pub mod analytics_service;
pub mod stats_service;

pub use analytics_service::AnalyticsService;
pub use stats_service::StatsService;
