use std::future::Future;

use crate::domain::health::entities::HealthReport;

#[cfg_attr(test, mockall::automock)]
pub trait HealthCheckService: Send + Sync {
    fn health(&self) -> impl Future<Output = HealthReport> + Send;
}
