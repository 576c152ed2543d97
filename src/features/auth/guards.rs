//! Role-based authorization guards.
//!
//! The management API has a single role, `admin`. Everyone else only sees the
//! public catalog.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for admin-only handlers.
///
/// Rejects with 401 when no user is attached to the request and 403 when the
/// user lacks the "admin" role.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{with_admin_auth, with_viewer_auth};
    use axum::{http::StatusCode, routing::get, Router};
    use axum_test::TestServer;

    async fn admin_only(RequireAdmin(user): RequireAdmin) -> String {
        user.sub
    }

    fn router() -> Router {
        Router::new().route("/admin-only", get(admin_only))
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthorized() {
        let server = TestServer::new(router()).unwrap();
        let response = server.get("/admin-only").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_user_without_admin_role_is_forbidden() {
        let server = TestServer::new(with_viewer_auth(router())).unwrap();
        let response = server.get("/admin-only").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let server = TestServer::new(with_admin_auth(router())).unwrap();
        let response = server.get("/admin-only").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "test-admin");
    }
}
