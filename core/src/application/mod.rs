use crate::{
    domain::{
        common::{
            MenuLensConfig,
            entities::app_errors::CoreError,
            services::{Service, ServiceSettings},
        },
        image_enrichment::value_objects::EnrichmentOptions,
        menu_scan::policies::UploadPolicy,
    },
    infrastructure::{
        image_search::ConfiguredImageSearch, llm::ConfiguredVisionClient,
        storage::LocalImageStore,
    },
};

pub type MenuLensService = Service<ConfiguredVisionClient, ConfiguredImageSearch, LocalImageStore>;

pub async fn create_service(config: MenuLensConfig) -> Result<MenuLensService, CoreError> {
    let vision_client = ConfiguredVisionClient::from_config(&config.vision)?;
    let image_search = ConfiguredImageSearch::from_config(&config.image_search)?;
    let image_store = LocalImageStore::new(config.storage.upload_dir.clone()).await?;

    Ok(Service::new(
        vision_client,
        image_search,
        image_store,
        ServiceSettings {
            upload_policy: UploadPolicy::new(config.storage.max_upload_size),
            analysis: config.analysis,
            enrichment: EnrichmentOptions {
                concurrency: config.image_search.concurrency.max(1),
                per_item_timeout: config.image_search.per_item_timeout,
            },
            app: config.app,
        },
    ))
}
