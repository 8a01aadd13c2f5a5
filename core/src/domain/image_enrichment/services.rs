use futures::{StreamExt, stream};

use crate::domain::{
    common::services::Service,
    image_enrichment::{
        ports::ImageSearchPort,
        value_objects::{DishImageQuery, is_acceptable_image_url},
    },
    menu_analysis::{entities::MenuItem, ports::VisionClient},
    menu_scan::ports::MenuImageStore,
};

impl<V, IS, ST> Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    /// Attaches an image URL to each item. Lookups run concurrently up to the
    /// configured limit; results are gathered back in input order. A failed,
    /// empty or slow lookup leaves that item's `image_url` unset.
    pub(crate) async fn enrich_items(
        &self,
        items: Vec<MenuItem>,
        cuisine_hint: Option<&str>,
    ) -> Vec<MenuItem> {
        let lookups: Vec<_> = items
            .iter()
            .map(|item| self.lookup_image(DishImageQuery::new(item.name.clone(), cuisine_hint)))
            .collect();

        let urls: Vec<Option<String>> = stream::iter(lookups)
            .buffered(self.enrichment.concurrency.max(1))
            .collect()
            .await;

        items
            .into_iter()
            .zip(urls)
            .map(|(mut item, image_url)| {
                item.image_url = image_url;
                item
            })
            .collect()
    }

    async fn lookup_image(&self, query: DishImageQuery) -> Option<String> {
        if query.dish_name.is_empty() {
            return None;
        }

        let lookup = self.image_search.search_dish_image(&query);
        match tokio::time::timeout(self.enrichment.per_item_timeout, lookup).await {
            Ok(Ok(Some(url))) if is_acceptable_image_url(&url) => Some(url),
            Ok(Ok(Some(url))) => {
                tracing::warn!(dish = %query.dish_name, url = %url, "Ignoring unusable image URL");
                None
            }
            Ok(Ok(None)) => {
                tracing::debug!(dish = %query.dish_name, "No image found for dish");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(dish = %query.dish_name, error = %e, "Image lookup failed");
                None
            }
            Err(_) => {
                tracing::warn!(
                    dish = %query.dish_name,
                    timeout_ms = self.enrichment.per_item_timeout.as_millis() as u64,
                    "Image lookup timed out"
                );
                None
            }
        }
    }
}
