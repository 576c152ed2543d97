//! Link health checks.
//!
//! A check issues a HEAD request (redirects followed) and treats a final 2xx
//! or 3xx status as healthy. Every check is stored, and the link's
//! `health_status` and `last_health_check` reflect the latest one. When
//! `HEALTH_CHECK_INTERVAL_SECS` is set, [`workers::HealthMonitor`] sweeps all
//! active links periodically.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/links/{id}/health` | Latest check of a link |
//! | POST | `/api/admin/links/{id}/health-check` | Check one link now |
//! | POST | `/api/admin/health-checks` | Check all active links |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::HealthCheckService;
pub use workers::HealthMonitor;
