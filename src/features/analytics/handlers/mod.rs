pub mod analytics_handler;
pub mod stats_handler;

pub use analytics_handler::*;
pub use stats_handler::*;
