use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::analytics::models::{AnalyticsSession, LinkAnalytics};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_ANALYTICS_ROWS};

/// Query params for the raw click listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AnalyticsQueryParams {
    /// Only clicks on this link
    pub link_id: Option<Uuid>,
    /// Clicks at or after this instant (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Clicks at or before this instant (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    /// Maximum rows (default 10000)
    #[param(minimum = 1, maximum = 10000)]
    pub limit: Option<i64>,
}

impl AnalyticsQueryParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(MAX_ANALYTICS_ROWS)
            .clamp(1, MAX_ANALYTICS_ROWS)
    }
}

/// Query params for the session listing
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SessionQueryParams {
    /// Sessions that started at or after this instant (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Sessions last seen at or before this instant (RFC 3339)
    pub to: Option<DateTime<Utc>>,
    /// Maximum rows (default 50)
    #[param(minimum = 1, maximum = 10000)]
    pub limit: Option<i64>,
}

impl SessionQueryParams {
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_ANALYTICS_ROWS)
    }

    pub fn check_range(&self) -> Result<()> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(AppError::Validation(
                "'from' must not be later than 'to'".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LinkAnalyticsResponseDto {
    pub id: Uuid,
    pub link_id: Uuid,
    pub clicked_at: DateTime<Utc>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub session_id: Option<String>,
}

impl From<LinkAnalytics> for LinkAnalyticsResponseDto {
    fn from(a: LinkAnalytics) -> Self {
        Self {
            id: a.id,
            link_id: a.link_id,
            clicked_at: a.clicked_at,
            device_type: a.device_type,
            browser: a.browser,
            os: a.os,
            user_agent: a.user_agent,
            referrer: a.referrer,
            country: a.country,
            region: a.region,
            city: a.city,
            session_id: a.session_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsSessionResponseDto {
    pub session_id: String,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
    pub total_clicks: i32,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub referrer: Option<String>,
}

impl From<AnalyticsSession> for AnalyticsSessionResponseDto {
    fn from(s: AnalyticsSession) -> Self {
        Self {
            session_id: s.session_id,
            first_seen_at: s.first_seen_at,
            last_seen_at: s.last_seen_at,
            total_clicks: s.total_clicks,
            device_type: s.device_type,
            browser: s.browser,
            os: s.os,
            referrer: s.referrer,
        }
    }
}

/// Result of tracking a click
#[derive(Debug, Serialize, ToSchema)]
pub struct ClickResponseDto {
    pub link_id: Uuid,
    pub click_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_limit_is_capped() {
        let params = AnalyticsQueryParams {
            limit: Some(50_000),
            ..Default::default()
        };
        assert_eq!(params.limit(), MAX_ANALYTICS_ROWS);

        assert_eq!(AnalyticsQueryParams::default().limit(), MAX_ANALYTICS_ROWS);

        let zero = AnalyticsQueryParams {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.limit(), 1);
    }

    #[test]
    fn test_session_limit_defaults_to_page_size() {
        assert_eq!(SessionQueryParams::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_session_window() {
        let params: SessionQueryParams = serde_json::from_value(serde_json::json!({
            "from": "2026-01-01T00:00:00Z",
            "to": "2026-01-31T23:59:59Z"
        }))
        .unwrap();
        assert!(params.from.is_some() && params.to.is_some());
        assert!(params.check_range().is_ok());

        let reversed = SessionQueryParams {
            from: params.to,
            to: params.from,
            ..Default::default()
        };
        assert!(matches!(
            reversed.check_range(),
            Err(AppError::Validation(_))
        ));

        let open_ended = SessionQueryParams {
            from: params.from,
            ..Default::default()
        };
        assert!(open_ended.check_range().is_ok());
    }
}
