pub mod tag_handler;

pub use tag_handler::*;
