use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::ClientContext;
use crate::features::analytics::dtos::{
    AnalyticsQueryParams, AnalyticsSessionResponseDto, ClickResponseDto,
    LinkAnalyticsResponseDto, SessionQueryParams,
};
use crate::features::analytics::services::AnalyticsService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::constants::ANALYTICS_SESSION_COOKIE;
use crate::shared::cookies::{generate_session_id, visitor_cookie};
use crate::shared::types::{ApiResponse, Meta};

/// Analytics session of the caller, started on first click
fn session_from(jar: &CookieJar) -> (String, bool) {
    match jar.get(ANALYTICS_SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => (cookie.value().to_string(), false),
        _ => (generate_session_id("session"), true),
    }
}

/// Record a click on a link
#[utoipa::path(
    post,
    path = "/api/links/{id}/click",
    params(
        ("id" = Uuid, Path, description = "Link ID")
    ),
    responses(
        (status = 200, description = "Click recorded", body = ApiResponse<ClickResponseDto>),
        (status = 404, description = "Link not found")
    ),
    tag = "analytics"
)]
pub async fn track_click(
    State(service): State<Arc<AnalyticsService>>,
    Path(link_id): Path<Uuid>,
    client: ClientContext,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<ClickResponseDto>>)> {
    let (session_id, is_new) = session_from(&jar);
    let click_count = service.track_click(link_id, &session_id, &client).await?;

    let jar = if is_new {
        jar.add(visitor_cookie(
            ANALYTICS_SESSION_COOKIE,
            session_id,
            None,
            service.cookie_secure(),
        ))
    } else {
        jar
    };

    Ok((
        jar,
        Json(ApiResponse::success(
            Some(ClickResponseDto {
                link_id,
                click_count,
            }),
            None,
            None,
        )),
    ))
}

/// Raw click records, newest first (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    params(AnalyticsQueryParams),
    responses(
        (status = 200, description = "Click records", body = ApiResponse<Vec<LinkAnalyticsResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "analytics",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_analytics(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Query(params): Query<AnalyticsQueryParams>,
) -> Result<Json<ApiResponse<Vec<LinkAnalyticsResponseDto>>>> {
    let rows: Vec<LinkAnalyticsResponseDto> = service
        .list(&params)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = rows.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(rows),
        None,
        Some(Meta { total }),
    )))
}

/// Visitor sessions, most recently active first (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/analytics/sessions",
    params(SessionQueryParams),
    responses(
        (status = 200, description = "Sessions", body = ApiResponse<Vec<AnalyticsSessionResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "analytics",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_sessions(
    RequireAdmin(_user): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Query(params): Query<SessionQueryParams>,
) -> Result<Json<ApiResponse<Vec<AnalyticsSessionResponseDto>>>> {
    let sessions: Vec<AnalyticsSessionResponseDto> = service
        .sessions(&params)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = sessions.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(sessions),
        None,
        Some(Meta { total }),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_session_is_reused() {
        let jar = CookieJar::new().add(visitor_cookie(
            ANALYTICS_SESSION_COOKIE,
            "session_1700000000000_abcdefghi",
            None,
            false,
        ));
        let (id, is_new) = session_from(&jar);
        assert_eq!(id, "session_1700000000000_abcdefghi");
        assert!(!is_new);
    }

    #[test]
    fn test_missing_session_is_generated() {
        let (id, is_new) = session_from(&CookieJar::new());
        assert!(id.starts_with("session_"));
        assert!(is_new);
    }
}
