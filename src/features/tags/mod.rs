//! Tags.
//!
//! Free-form labels attached to links through `link_tags`. `usage_count` is
//! recomputed from the join table whenever associations change.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/tags` | List tags by usage |
//! | GET | `/api/tags/{slug}` | Get tag by slug |
//! | POST | `/api/admin/tags` | Create tag |
//! | PUT | `/api/admin/tags/{id}` | Update tag |
//! | DELETE | `/api/admin/tags/{id}` | Delete tag |
//! | POST | `/api/admin/tags/resolve` | Create-or-reuse tags by name |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::TagService;
