use std::time::Duration;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::shared::fetcher::FetchError;

/// Database model for one health check of a link
#[derive(Debug, Clone, FromRow)]
pub struct LinkHealthCheck {
    pub id: Uuid,
    pub link_id: Uuid,
    pub status_code: Option<i32>,
    pub status_text: Option<String>,
    pub response_time_ms: Option<i32>,
    pub is_healthy: bool,
    pub error_message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

pub const HEALTH_CHECK_COLUMNS: &str =
    "id, link_id, status_code, status_text, response_time_ms, is_healthy, error_message, checked_at";

/// Result of probing a URL, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthOutcome {
    pub status_code: Option<i32>,
    pub status_text: String,
    pub is_healthy: bool,
    pub error_message: Option<String>,
    pub response_time_ms: i32,
}

impl HealthOutcome {
    /// 2xx and 3xx are healthy. Timeouts and network errors are recorded, not raised.
    pub fn classify(result: Result<u16, FetchError>, elapsed: Duration) -> Self {
        let response_time_ms = i32::try_from(elapsed.as_millis()).unwrap_or(i32::MAX);

        match result {
            Ok(code) => {
                let status_text = StatusCode::from_u16(code)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Unknown")
                    .to_string();
                let is_healthy = (200..400).contains(&code);
                Self {
                    status_code: Some(i32::from(code)),
                    status_text,
                    is_healthy,
                    error_message: (!is_healthy).then(|| format!("HTTP {}", code)),
                    response_time_ms,
                }
            }
            Err(e @ FetchError::Timeout(_)) => Self {
                status_code: None,
                status_text: "Timeout".to_string(),
                is_healthy: false,
                error_message: Some(e.to_string()),
                response_time_ms,
            },
            Err(e) => Self {
                status_code: None,
                status_text: "Error".to_string(),
                is_healthy: false,
                error_message: Some(e.to_string()),
                response_time_ms,
            },
        }
    }

    /// Value stored in `links.health_status`
    pub fn health_status(&self) -> &'static str {
        if self.is_healthy {
            "healthy"
        } else {
            "unhealthy"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_redirect_are_healthy() {
        let ok = HealthOutcome::classify(Ok(200), Duration::from_millis(120));
        assert!(ok.is_healthy);
        assert_eq!(ok.status_code, Some(200));
        assert_eq!(ok.status_text, "OK");
        assert_eq!(ok.response_time_ms, 120);
        assert_eq!(ok.health_status(), "healthy");

        let moved = HealthOutcome::classify(Ok(301), Duration::from_millis(5));
        assert!(moved.is_healthy);
        assert_eq!(moved.status_text, "Moved Permanently");
    }

    #[test]
    fn test_client_and_server_errors_are_unhealthy() {
        let missing = HealthOutcome::classify(Ok(404), Duration::ZERO);
        assert!(!missing.is_healthy);
        assert_eq!(missing.status_text, "Not Found");
        assert_eq!(missing.error_message.as_deref(), Some("HTTP 404"));
        assert_eq!(missing.health_status(), "unhealthy");

        assert!(!HealthOutcome::classify(Ok(503), Duration::ZERO).is_healthy);
    }

    #[test]
    fn test_timeout_outcome() {
        let outcome = HealthOutcome::classify(Err(FetchError::Timeout(5)), Duration::from_secs(5));
        assert_eq!(outcome.status_code, None);
        assert_eq!(outcome.status_text, "Timeout");
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("Request timed out after 5 seconds")
        );
    }

    #[test]
    fn test_network_error_outcome() {
        let outcome = HealthOutcome::classify(
            Err(FetchError::Request("connection refused".to_string())),
            Duration::from_millis(3),
        );
        assert_eq!(outcome.status_text, "Error");
        assert_eq!(outcome.error_message.as_deref(), Some("connection refused"));
        assert!(!outcome.is_healthy);
    }
}
