use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Serving, but a dependency (vision key, upload dir) is missing.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub app_name: String,
    pub version: String,
    pub ai_provider: String,
    pub model: String,
    pub vision_configured: bool,
    pub image_search_provider: String,
    pub image_search_configured: bool,
    pub upload_dir_writable: bool,
    pub database_configured: bool,
}
