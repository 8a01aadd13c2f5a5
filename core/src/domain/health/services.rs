use crate::domain::{
    common::services::Service,
    health::{
        entities::{HealthReport, HealthStatus},
        ports::HealthCheckService,
    },
    image_enrichment::ports::ImageSearchPort,
    menu_analysis::ports::VisionClient,
    menu_scan::ports::MenuImageStore,
};

impl<V, IS, ST> HealthCheckService for Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    async fn health(&self) -> HealthReport {
        let vision_configured = self.vision_client.is_configured();
        let upload_dir_writable = self.image_store.is_writable().await;

        let status = if vision_configured && upload_dir_writable {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        };

        HealthReport {
            status,
            app_name: self.app.name.clone(),
            version: self.app.version.clone(),
            ai_provider: self.vision_client.provider().to_string(),
            model: self.vision_client.model(),
            vision_configured,
            image_search_provider: self.image_search.provider_name().to_string(),
            image_search_configured: self.image_search.is_configured(),
            upload_dir_writable,
            database_configured: self.app.database_url.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::test_support::{
        FakeImageSearch, FakeVision, InMemoryImageStore, test_service,
    };

    #[tokio::test]
    async fn test_health_reports_provider_configuration() {
        let service = test_service(
            FakeVision::scripted(vec![]),
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );

        let report = service.health().await;

        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.ai_provider, "anthropic");
        assert_eq!(report.model, "fake-vision-model");
        assert!(report.vision_configured);
        assert_eq!(report.image_search_provider, "none");
        assert!(!report.image_search_configured);
        assert!(report.upload_dir_writable);
        assert!(!report.database_configured);
    }
}
