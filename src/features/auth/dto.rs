use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /api/auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub sub: String,
    pub email: Option<String>,
    pub roles: Vec<String>,
    /// Whether the caller may use the admin panel
    pub is_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        let is_admin = user.is_admin();
        Self {
            sub: user.sub,
            email: user.email,
            roles: user.roles,
            is_admin,
        }
    }
}
