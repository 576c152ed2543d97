use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::votes::handlers;
use crate::features::votes::services::VoteService;

/// Public vote routes
pub fn routes(service: Arc<VoteService>) -> Router {
    Router::new()
        .route(
            "/api/links/{id}/vote",
            get(handlers::get_vote).post(handlers::cast_vote),
        )
        .with_state(service)
}
