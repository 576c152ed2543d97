pub mod health_check_dto;

pub use health_check_dto::{BulkHealthCheckResponseDto, HealthCheckResponseDto};
