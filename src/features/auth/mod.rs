//! Bearer token authentication.
//!
//! Sign-in happens at the external OIDC provider. This module validates the
//! resulting RS256 access tokens against the provider's JWKS and exposes the
//! `RequireAdmin` guard used by every management endpoint.

mod jwks;
mod validator;

pub mod dto;
pub mod guards;
pub mod handler;
pub mod model;
pub mod routes;

pub use jwks::JwksClient;
pub use validator::JwtValidator;
