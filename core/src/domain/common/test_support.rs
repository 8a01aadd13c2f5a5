//! In-memory port implementations shared by the domain service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;

use crate::domain::{
    common::{
        AnalysisConfig, AppInfo,
        entities::app_errors::CoreError,
        services::{Service, ServiceSettings},
    },
    image_enrichment::{
        ports::ImageSearchPort,
        value_objects::{DishImageQuery, EnrichmentOptions},
    },
    menu_analysis::{
        ports::VisionClient,
        value_objects::{VisionProvider, VisionRequest},
    },
    menu_scan::{
        entities::StoredImage, policies::UploadPolicy, ports::MenuImageStore,
        value_objects::StoredFilename,
    },
};

pub(crate) type TestService = Service<FakeVision, FakeImageSearch, InMemoryImageStore>;

pub(crate) fn test_service(
    vision: FakeVision,
    image_search: FakeImageSearch,
    image_store: InMemoryImageStore,
) -> TestService {
    Service::new(
        vision,
        image_search,
        image_store,
        ServiceSettings {
            upload_policy: UploadPolicy::new(1024),
            analysis: AnalysisConfig {
                retry_backoff: Duration::from_millis(1),
                request_timeout: Duration::from_secs(5),
            },
            enrichment: EnrichmentOptions {
                concurrency: 2,
                per_item_timeout: Duration::from_secs(10),
            },
            app: AppInfo {
                name: "menulens".to_string(),
                version: "0.0.0-test".to_string(),
                database_url: None,
            },
        },
    )
}

/// Vision client that replays scripted responses and counts calls.
#[derive(Clone)]
pub(crate) struct FakeVision {
    responses: Arc<Mutex<VecDeque<Result<String, CoreError>>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl FakeVision {
    pub(crate) fn scripted(responses: Vec<Result<String, CoreError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VisionClient for FakeVision {
    fn provider(&self) -> VisionProvider {
        VisionProvider::Anthropic
    }

    fn model(&self) -> String {
        "fake-vision-model".to_string()
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn analyze_image(&self, _request: &VisionRequest) -> Result<String, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.responses
            .lock()
            .expect("vision script lock")
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::ProviderUnavailable("script exhausted".to_string())))
    }
}

#[derive(Default)]
struct SearchStats {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_cuisine_hint: Mutex<Option<String>>,
}

/// Image search keyed by dish name.
#[derive(Clone)]
pub(crate) struct FakeImageSearch {
    configured: bool,
    urls: HashMap<String, String>,
    failures: HashMap<String, CoreError>,
    slow: HashMap<String, Duration>,
    latency: Duration,
    stats: Arc<SearchStats>,
}

impl FakeImageSearch {
    pub(crate) fn with_urls(urls: &[(&str, &str)]) -> Self {
        Self {
            configured: true,
            urls: urls
                .iter()
                .map(|(dish, url)| (dish.to_string(), url.to_string()))
                .collect(),
            failures: HashMap::new(),
            slow: HashMap::new(),
            latency: Duration::ZERO,
            stats: Arc::new(SearchStats::default()),
        }
    }

    pub(crate) fn disabled() -> Self {
        Self {
            configured: false,
            ..Self::with_urls(&[])
        }
    }

    pub(crate) fn with_failure(mut self, dish: &str, error: CoreError) -> Self {
        self.failures.insert(dish.to_string(), error);
        self
    }

    pub(crate) fn with_slow(mut self, dish: &str, delay: Duration) -> Self {
        self.slow.insert(dish.to_string(), delay);
        self
    }

    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.stats.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.stats.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn last_cuisine_hint(&self) -> Option<String> {
        self.stats
            .last_cuisine_hint
            .lock()
            .expect("hint lock")
            .clone()
    }
}

impl ImageSearchPort for FakeImageSearch {
    fn provider_name(&self) -> &'static str {
        if self.configured { "fake" } else { "none" }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn search_dish_image(&self, query: &DishImageQuery) -> Result<Option<String>, CoreError> {
        self.stats.calls.fetch_add(1, Ordering::SeqCst);
        *self.stats.last_cuisine_hint.lock().expect("hint lock") = query.cuisine_hint.clone();

        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .slow
            .get(&query.dish_name)
            .copied()
            .unwrap_or(self.latency);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.failures.get(&query.dish_name) {
            return Err(error.clone());
        }

        Ok(self.urls.get(&query.dish_name).cloned())
    }
}

#[derive(Clone, Default)]
pub(crate) struct InMemoryImageStore {
    files: Arc<Mutex<HashMap<String, (Bytes, StoredImage)>>>,
}

impl InMemoryImageStore {
    pub(crate) fn len(&self) -> usize {
        self.files.lock().expect("store lock").len()
    }
}

impl MenuImageStore for InMemoryImageStore {
    async fn write(&self, filename: &StoredFilename, data: Bytes) -> Result<StoredImage, CoreError> {
        let stored = StoredImage {
            path: format!("memory://{filename}"),
            size_bytes: data.len() as u64,
            created_at: Utc::now(),
        };
        self.files
            .lock()
            .expect("store lock")
            .insert(filename.to_string(), (data, stored.clone()));
        Ok(stored)
    }

    async fn read(&self, filename: &StoredFilename) -> Result<Bytes, CoreError> {
        self.files
            .lock()
            .expect("store lock")
            .get(filename.as_str())
            .map(|(data, _)| data.clone())
            .ok_or(CoreError::NotFound)
    }

    async fn stat(&self, filename: &StoredFilename) -> Result<Option<StoredImage>, CoreError> {
        Ok(self
            .files
            .lock()
            .expect("store lock")
            .get(filename.as_str())
            .map(|(_, stored)| stored.clone()))
    }

    async fn delete(&self, filename: &StoredFilename) -> Result<bool, CoreError> {
        Ok(self
            .files
            .lock()
            .expect("store lock")
            .remove(filename.as_str())
            .is_some())
    }

    async fn is_writable(&self) -> bool {
        true
    }
}
