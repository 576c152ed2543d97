//! Links.
//!
//! A link is visible to the public when it is active, not expired and inside
//! its optional publishing window. Public reads go through the catalog cache;
//! admin reads always hit the database.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/links` | Visible links, pinned first |
//! | GET | `/api/links/{id}` | Visible link by id |
//! | GET | `/api/links/{id}/tags` | Tags of a visible link |
//! | GET | `/api/admin/links` | All links |
//! | POST | `/api/admin/links` | Create link |
//! | PUT | `/api/admin/links/{id}` | Update link |
//! | DELETE | `/api/admin/links/{id}` | Delete link |
//! | PUT | `/api/admin/links/order` | Save explicit positions |
//! | POST | `/api/admin/links/move` | Drag-and-drop move within a category |
//! | PUT | `/api/admin/links/{id}/tags` | Sync tags to an exact set |
//! | POST | `/api/admin/links/{id}/tags` | Attach a tag |
//! | DELETE | `/api/admin/links/{id}/tags/{tag_id}` | Detach a tag |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LinkService;
