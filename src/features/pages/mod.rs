//! Public page composition.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/home?search=` | Home page sections |
//! | GET | `/api/categories/{slug}/links?subcategory=&search=` | Category page |
//! | GET | `/api/tags/{slug}/links?search=` | Tag page |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::PageService;
