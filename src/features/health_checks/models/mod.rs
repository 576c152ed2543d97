pub mod health_check;

pub use health_check::{HealthOutcome, LinkHealthCheck, HEALTH_CHECK_COLUMNS};
