//! Link categories.
//!
//! Categories group links into sections. Each carries an optional list of
//! subcategory labels, a display position and a flag for showing its links on
//! the home page. The `this-week` and `this-month` categories are time-based
//! and their slugs cannot be changed.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories` | List categories in display order |
//! | GET | `/api/categories/{slug}` | Get category by slug |
//! | POST | `/api/admin/categories` | Create category |
//! | PUT | `/api/admin/categories/{id}` | Update category |
//! | DELETE | `/api/admin/categories/{id}` | Delete category (links become uncategorized) |
//! | DELETE | `/api/admin/categories/{id}/links` | Delete every link in the category |
//! | PUT | `/api/admin/categories/order` | Save explicit positions |
//! | POST | `/api/admin/categories/move` | Drag-and-drop move |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::CategoryService;
