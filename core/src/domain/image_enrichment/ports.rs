use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError, image_enrichment::value_objects::DishImageQuery,
};

/// Finds (or generates) a representative photo for a dish.
#[cfg_attr(test, mockall::automock)]
pub trait ImageSearchPort: Send + Sync {
    fn provider_name(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    /// `Ok(None)` when the provider found nothing acceptable.
    fn search_dish_image(
        &self,
        query: &DishImageQuery,
    ) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;
}
