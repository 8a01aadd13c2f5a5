use crate::domain::{
    allergen::entities::AllergenInfo,
    common::services::Service,
    image_enrichment::ports::ImageSearchPort,
    menu_analysis::ports::VisionClient,
    menu_scan::ports::MenuImageStore,
};

pub trait AllergenService: Send + Sync {
    fn list_allergens(&self) -> Vec<AllergenInfo>;
}

impl<V, IS, ST> AllergenService for Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    fn list_allergens(&self) -> Vec<AllergenInfo> {
        self.allergen_catalog.entries()
    }
}
