//! CSV exports of links and click records.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/export/links.csv` | Every link |
//! | GET | `/api/admin/export/analytics.csv` | Click records (same filters as `/api/admin/analytics`) |

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ExportService;
