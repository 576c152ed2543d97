pub mod cache;
pub mod constants;
pub mod cookies;
pub mod fetcher;
pub mod reorder;
pub mod test_helpers;
pub mod types;
pub mod validation;
