pub mod analytics;
pub mod stats;
pub mod user_agent;

pub use analytics::{AnalyticsSession, LinkAnalytics, ANALYTICS_COLUMNS, SESSION_COLUMNS};
pub use stats::{CategoryStats, StatsTotals, TopLink};
pub use user_agent::parse_user_agent;
