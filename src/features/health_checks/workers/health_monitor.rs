use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::features::health_checks::services::HealthCheckService;

/// Periodically checks every active link in the background
pub struct HealthMonitor {
    service: Arc<HealthCheckService>,
    period: Duration,
}

impl HealthMonitor {
    pub fn new(service: Arc<HealthCheckService>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Run the monitor loop forever
    pub async fn run(&self) {
        tracing::info!(
            "Starting link health monitor (every {}s)",
            self.period.as_secs()
        );

        let mut interval = interval(self.period);
        // A slow sweep must not trigger a burst of catch-up sweeps
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if let Err(e) = self.service.check_all_active().await {
                tracing::error!("Error during scheduled health check: {:?}", e);
            }
        }
    }
}
