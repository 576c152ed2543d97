//! Click tracking, raw analytics and the admin stats summary.
//!
//! Clicks are grouped into sessions by the `analytics_session_id` cookie,
//! which lives for the browser session. Device, browser and OS come from the
//! `User-Agent` header.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/links/{id}/click` | Record a click |
//! | GET | `/api/admin/analytics` | Raw clicks (`link_id`, `from`, `to`, `limit`) |
//! | GET | `/api/admin/analytics/sessions` | Visitor sessions |
//! | GET | `/api/admin/stats` | Totals, top links, per-category numbers |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AnalyticsService, StatsService};
