//! Link previews from Open Graph / Twitter card metadata.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/links/{id}/preview` | Stored preview |
//! | POST | `/api/admin/links/{id}/preview` | Fetch the page and store its preview |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PreviewService;
