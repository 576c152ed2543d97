//! Link votes.
//!
//! Visitors are identified by the `vote_session_id` cookie; their vote on a
//! link is remembered in a per-link cookie. The database keeps every vote row
//! but has no uniqueness constraint, so a visitor who clears cookies can vote
//! again.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/links/{id}/vote` | Vote totals and the caller's vote |
//! | POST | `/api/links/{id}/vote` | Cast or change a vote |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::VoteService;
