use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::health_checks::models::LinkHealthCheck;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponseDto {
    pub id: Uuid,
    pub link_id: Uuid,
    pub status_code: Option<i32>,
    pub status_text: Option<String>,
    pub response_time_ms: Option<i32>,
    pub is_healthy: bool,
    pub error_message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl From<LinkHealthCheck> for HealthCheckResponseDto {
    fn from(c: LinkHealthCheck) -> Self {
        Self {
            id: c.id,
            link_id: c.link_id,
            status_code: c.status_code,
            status_text: c.status_text,
            response_time_ms: c.response_time_ms,
            is_healthy: c.is_healthy,
            error_message: c.error_message,
            checked_at: c.checked_at,
        }
    }
}

/// Totals from checking every active link
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BulkHealthCheckResponseDto {
    pub checked: usize,
    pub healthy: usize,
    pub unhealthy: usize,
    /// Checks that ran but could not be stored
    pub failed: usize,
}
