use std::sync::Arc;

use crate::domain::{
    allergen::entities::AllergenCatalog,
    common::{AnalysisConfig, AppInfo},
    image_enrichment::{ports::ImageSearchPort, value_objects::EnrichmentOptions},
    menu_analysis::ports::VisionClient,
    menu_scan::{policies::UploadPolicy, ports::MenuImageStore},
};

#[derive(Clone, Debug)]
pub struct ServiceSettings {
    pub upload_policy: UploadPolicy,
    pub analysis: AnalysisConfig,
    pub enrichment: EnrichmentOptions,
    pub app: AppInfo,
}

/// Application service. Every domain service trait is implemented on this type,
/// parameterised over the adapters it drives.
#[derive(Clone)]
pub struct Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    pub(crate) vision_client: V,
    pub(crate) image_search: IS,
    pub(crate) image_store: ST,
    pub(crate) allergen_catalog: Arc<AllergenCatalog>,
    pub(crate) upload_policy: UploadPolicy,
    pub(crate) analysis: AnalysisConfig,
    pub(crate) enrichment: EnrichmentOptions,
    pub(crate) app: AppInfo,
}

impl<V, IS, ST> Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    pub fn new(vision_client: V, image_search: IS, image_store: ST, settings: ServiceSettings) -> Self {
        Self {
            vision_client,
            image_search,
            image_store,
            allergen_catalog: Arc::new(AllergenCatalog::standard()),
            upload_policy: settings.upload_policy,
            analysis: settings.analysis,
            enrichment: settings.enrichment,
            app: settings.app,
        }
    }

    pub fn allergen_catalog(&self) -> &AllergenCatalog {
        &self.allergen_catalog
    }
}
