pub mod health_check_handler;

pub use health_check_handler::*;
