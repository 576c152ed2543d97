#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
use crate::shared::constants::ROLE_ADMIN;

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-admin".to_string(),
        email: Some("admin@example.com".to_string()),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

#[cfg(test)]
pub fn create_viewer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "test-viewer".to_string(),
        email: None,
        roles: Vec::new(),
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_viewer_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_viewer_user());
    next.run(request).await
}

/// Wrap a router so every request carries an authenticated admin
#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Wrap a router so every request carries an authenticated user without roles
#[cfg(test)]
pub fn with_viewer_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_viewer_middleware))
}
