use std::time::{Duration, Instant};

use rand::Rng;
use tracing::instrument;

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    image_enrichment::ports::ImageSearchPort,
    menu_analysis::{
        entities::{EnrichmentSummary, MenuAnalysisResult, ProcessingMetadata},
        normalizer::normalize_menu_response,
        ports::{MenuAnalysisService, VisionClient},
        schema::menu_analysis_instruction,
        value_objects::{AnalysisStage, AnalyzeMenuInput, VisionRequest},
    },
    menu_scan::{entities::MenuScan, ports::MenuImageStore, value_objects::ImageFormat},
};

fn record_stage(stage: AnalysisStage, filename: &str) {
    tracing::debug!(stage = ?stage, filename = %filename, "Menu analysis stage");
}

/// Base delay plus up to 50% random jitter.
fn backoff_with_jitter(base: Duration) -> Duration {
    let half = (base.as_millis() / 2) as u64;
    if half == 0 {
        return base;
    }
    base + Duration::from_millis(rand::thread_rng().gen_range(0..=half))
}

impl<V, IS, ST> Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    /// One call, plus a single retry when the provider is transiently unavailable.
    async fn request_analysis(&self, request: &VisionRequest) -> Result<String, CoreError> {
        match self.vision_client.analyze_image(request).await {
            Err(e) if e.is_retryable() => {
                let delay = backoff_with_jitter(self.analysis.retry_backoff);
                tracing::warn!(
                    error = %e,
                    delay_ms = delay.as_millis() as u64,
                    "Vision provider unavailable, retrying once"
                );
                tokio::time::sleep(delay).await;
                self.vision_client.analyze_image(request).await
            }
            other => other,
        }
    }

    async fn run_analysis(
        &self,
        scan: MenuScan,
        request: VisionRequest,
        input_enrich: bool,
        cuisine_hint: Option<String>,
        started: Instant,
    ) -> Result<MenuAnalysisResult, CoreError> {
        record_stage(AnalysisStage::AnalysisRequested, &scan.filename);

        let raw = match self.request_analysis(&request).await {
            Ok(raw) => {
                record_stage(AnalysisStage::AnalysisSucceeded, &scan.filename);
                raw
            }
            Err(e) => {
                record_stage(AnalysisStage::AnalysisFailed, &scan.filename);
                tracing::error!(filename = %scan.filename, error = %e, "Menu analysis failed");
                return Err(e);
            }
        };

        let normalized = normalize_menu_response(&raw, &self.allergen_catalog);
        record_stage(AnalysisStage::Normalized, &scan.filename);
        tracing::info!(
            filename = %scan.filename,
            items = normalized.items.len(),
            degraded = normalized.degraded,
            "Menu response normalized"
        );

        let provider_name = self.image_search.provider_name();
        let attempted = input_enrich && self.image_search.is_configured();

        let (items, enrichment) = if attempted {
            let hint = cuisine_hint.or_else(|| normalized.cuisine_type.clone());
            let items = self.enrich_items(normalized.items, hint.as_deref()).await;
            let enriched_items = items.iter().filter(|i| i.image_url.is_some()).count();
            record_stage(AnalysisStage::Enriched, &scan.filename);
            (
                items,
                EnrichmentSummary {
                    provider: provider_name.to_string(),
                    attempted: true,
                    enriched_items,
                },
            )
        } else {
            (normalized.items, EnrichmentSummary::skipped(provider_name))
        };

        let result = MenuAnalysisResult {
            items,
            language: normalized.language,
            cuisine_type: normalized.cuisine_type,
            parse_degraded: normalized.degraded,
            metadata: ProcessingMetadata {
                provider: self.vision_client.provider(),
                model: self.vision_client.model(),
                analyzed_at: chrono::Utc::now(),
                duration_ms: started.elapsed().as_millis() as u64,
                enrichment,
            },
            scan,
        };
        record_stage(AnalysisStage::Assembled, &result.scan.filename);

        Ok(result)
    }
}

impl<V, IS, ST> MenuAnalysisService for Service<V, IS, ST>
where
    V: VisionClient,
    IS: ImageSearchPort,
    ST: MenuImageStore,
{
    #[instrument(skip(self, input), fields(enrich = input.enrich))]
    async fn analyze_menu(&self, input: AnalyzeMenuInput) -> Result<MenuAnalysisResult, CoreError> {
        let started = Instant::now();
        record_stage(AnalysisStage::Received, input.upload.filename.as_deref().unwrap_or(""));

        let image = input.upload.data.clone();
        let scan = self.store_menu_image(input.upload).await?;
        let media_type =
            ImageFormat::from_mime(&scan.content_type).ok_or(CoreError::InternalServerError)?;
        record_stage(AnalysisStage::ImageValidated, &scan.filename);

        let request = VisionRequest {
            image,
            media_type,
            instruction: menu_analysis_instruction(),
        };

        let deadline = self.analysis.request_timeout;
        let filename = scan.filename.clone();
        let analysis = self.run_analysis(scan, request, input.enrich, input.cuisine_hint, started);

        match tokio::time::timeout(deadline, analysis).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    filename = %filename,
                    timeout_secs = deadline.as_secs(),
                    "Menu analysis exceeded its deadline"
                );
                Err(CoreError::ProviderUnavailable(
                    "menu analysis timed out".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use bytes::Bytes;

    use super::*;
    use crate::domain::{
        common::test_support::{FakeImageSearch, FakeVision, InMemoryImageStore, test_service},
        menu_analysis::entities::{DietaryClassification, MeatType},
        menu_scan::value_objects::UploadMenuImageInput,
    };

    const THREE_ITEMS: &str = r#"{
        "menu_items": [
            {"name": "Bacon Burger", "classification": "non-vegetarian", "meat": ["pork"]},
            {"name": "Greek Salad", "classification": "vegetarian", "allergens": ["Dairy"]},
            {"name": "Lentil Soup"}
        ],
        "language": "English",
        "cuisine_type": "American"
    }"#;

    fn menu_input(enrich: bool) -> AnalyzeMenuInput {
        AnalyzeMenuInput {
            upload: UploadMenuImageInput {
                data: Bytes::from_static(b"\xFF\xD8\xFFmenu-photo"),
                content_type: Some("image/jpeg".to_string()),
                filename: Some("menu.jpg".to_string()),
            },
            enrich,
            cuisine_hint: None,
        }
    }

    #[tokio::test]
    async fn test_analyze_menu_assembles_items_in_model_order() {
        let vision = FakeVision::scripted(vec![Ok(THREE_ITEMS.to_string())]);
        let search = FakeImageSearch::with_urls(&[
            ("Bacon Burger", "https://images.example.com/burger.jpg"),
            ("Lentil Soup", "https://images.example.com/soup.jpg"),
        ]);
        let service = test_service(vision.clone(), search, InMemoryImageStore::default());

        let result = service.analyze_menu(menu_input(true)).await.unwrap();

        let names: Vec<_> = result.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Bacon Burger", "Greek Salad", "Lentil Soup"]);
        assert_eq!(result.items[0].meat_types, BTreeSet::from([MeatType::Pork]));
        assert_eq!(
            result.items[0].dietary_classification,
            DietaryClassification::NonVegetarian
        );
        assert_eq!(
            result.items[2].dietary_classification,
            DietaryClassification::Unknown
        );
        assert_eq!(
            result.items[0].image_url.as_deref(),
            Some("https://images.example.com/burger.jpg")
        );
        assert_eq!(result.items[1].image_url, None);
        assert_eq!(result.language.as_deref(), Some("English"));
        assert!(!result.parse_degraded);
        assert!(result.metadata.enrichment.attempted);
        assert_eq!(result.metadata.enrichment.enriched_items, 2);
        assert_eq!(result.scan.content_type, "image/jpeg");
        assert_eq!(vision.calls(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_provider_is_retried_once() {
        let vision = FakeVision::scripted(vec![
            Err(CoreError::ProviderUnavailable("connection reset".to_string())),
            Ok(THREE_ITEMS.to_string()),
        ]);
        let service = test_service(
            vision.clone(),
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );

        let result = service.analyze_menu(menu_input(true)).await.unwrap();

        assert_eq!(result.items.len(), 3);
        assert_eq!(vision.calls(), 2);
        assert!(!result.metadata.enrichment.attempted);
    }

    #[tokio::test]
    async fn test_second_unavailable_error_is_surfaced() {
        let vision = FakeVision::scripted(vec![
            Err(CoreError::ProviderUnavailable("timeout".to_string())),
            Err(CoreError::ProviderUnavailable("timeout".to_string())),
            Ok(THREE_ITEMS.to_string()),
        ]);
        let service = test_service(
            vision.clone(),
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );

        let err = service.analyze_menu(menu_input(false)).await.unwrap_err();

        assert!(matches!(err, CoreError::ProviderUnavailable(_)));
        assert_eq!(vision.calls(), 2);
    }

    #[tokio::test]
    async fn test_rejected_provider_is_not_retried() {
        let vision = FakeVision::scripted(vec![
            Err(CoreError::ProviderRejected("invalid api key".to_string())),
            Ok(THREE_ITEMS.to_string()),
        ]);
        let service = test_service(
            vision.clone(),
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );

        let err = service.analyze_menu(menu_input(false)).await.unwrap_err();

        assert!(matches!(err, CoreError::ProviderRejected(_)));
        assert_eq!(vision.calls(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_output_still_returns_result() {
        let vision = FakeVision::scripted(vec![Ok("I'm unable to read this menu.".to_string())]);
        let service = test_service(
            vision,
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );

        let result = service.analyze_menu(menu_input(true)).await.unwrap();

        assert!(result.parse_degraded);
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_upload_never_reaches_provider() {
        let vision = FakeVision::scripted(vec![Ok(THREE_ITEMS.to_string())]);
        let service = test_service(
            vision.clone(),
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );
        let mut input = menu_input(true);
        input.upload.content_type = Some("application/pdf".to_string());
        input.upload.filename = Some("menu.pdf".to_string());

        let err = service.analyze_menu(input).await.unwrap_err();

        assert!(matches!(err, CoreError::UnsupportedContentType(_)));
        assert_eq!(vision.calls(), 0);
    }

    #[tokio::test]
    async fn test_enrichment_skipped_when_not_requested() {
        let vision = FakeVision::scripted(vec![Ok(THREE_ITEMS.to_string())]);
        let search = FakeImageSearch::with_urls(&[("Bacon Burger", "https://img.example.com/b.jpg")]);
        let service = test_service(vision, search.clone(), InMemoryImageStore::default());

        let result = service.analyze_menu(menu_input(false)).await.unwrap();

        assert!(result.items.iter().all(|i| i.image_url.is_none()));
        assert!(!result.metadata.enrichment.attempted);
        assert_eq!(search.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overall_deadline_maps_to_provider_unavailable() {
        let vision = FakeVision::scripted(vec![Ok(THREE_ITEMS.to_string())])
            .with_delay(Duration::from_secs(600));
        let service = test_service(
            vision,
            FakeImageSearch::disabled(),
            InMemoryImageStore::default(),
        );

        let err = service.analyze_menu(menu_input(false)).await.unwrap_err();

        assert_eq!(
            err,
            CoreError::ProviderUnavailable("menu analysis timed out".to_string())
        );
    }

    #[test]
    fn test_backoff_jitter_stays_within_half_of_base() {
        let base = Duration::from_millis(500);
        for _ in 0..50 {
            let delay = backoff_with_jitter(base);
            assert!(delay >= base && delay <= Duration::from_millis(750));
        }
        assert_eq!(backoff_with_jitter(Duration::ZERO), Duration::ZERO);
    }
}
