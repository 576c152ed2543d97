pub mod health_check_service;

pub use health_check_service::HealthCheckService;
