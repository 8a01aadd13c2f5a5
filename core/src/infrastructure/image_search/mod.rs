pub mod dalle;
pub mod google;
pub mod unsplash;

use reqwest::{Client, StatusCode};

use crate::domain::{
    common::{ImageSearchConfig, ImageSearchProviderKind, entities::app_errors::CoreError},
    image_enrichment::{ports::ImageSearchPort, value_objects::DishImageQuery},
};

pub use dalle::DalleImageGenerator;
pub use google::GoogleImageSearch;
pub use unsplash::UnsplashImageSearch;

/// Results requested per search; the first acceptable URL among them is used.
pub(crate) const CANDIDATE_RESULTS: &str = "5";

/// Image source chosen by `IMAGE_SEARCH_PROVIDER`. A provider without
/// credentials is replaced by `Disabled`.
#[derive(Debug, Clone)]
pub enum ConfiguredImageSearch {
    Unsplash(UnsplashImageSearch),
    Google(GoogleImageSearch),
    Dalle(DalleImageGenerator),
    Disabled,
}

impl ConfiguredImageSearch {
    pub fn from_config(config: &ImageSearchConfig) -> Result<Self, CoreError> {
        let http = Client::builder()
            .timeout(config.per_item_timeout)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build image search HTTP client");
                CoreError::InternalServerError
            })?;

        let search = match config.provider {
            ImageSearchProviderKind::Unsplash => config
                .unsplash_access_key
                .clone()
                .map(|key| {
                    ConfiguredImageSearch::Unsplash(UnsplashImageSearch::new(
                        http,
                        key,
                        &config.unsplash_base_url,
                    ))
                }),
            ImageSearchProviderKind::Google => config
                .google_api_key
                .clone()
                .zip(config.google_engine_id.clone())
                .map(|(key, engine_id)| {
                    ConfiguredImageSearch::Google(GoogleImageSearch::new(
                        http,
                        key,
                        engine_id,
                        &config.google_base_url,
                    ))
                }),
            ImageSearchProviderKind::OpenAi => config.openai_api_key.clone().map(|key| {
                ConfiguredImageSearch::Dalle(DalleImageGenerator::new(
                    http,
                    key,
                    &config.openai_base_url,
                ))
            }),
            ImageSearchProviderKind::Disabled => None,
        };

        let search = search.unwrap_or_else(|| {
            if config.provider != ImageSearchProviderKind::Disabled {
                tracing::warn!(
                    provider = config.provider.as_str(),
                    "Image search credentials missing, enrichment disabled"
                );
            }
            ConfiguredImageSearch::Disabled
        });

        tracing::info!(provider = search.provider_name(), "Image search ready");
        Ok(search)
    }
}

impl ImageSearchPort for ConfiguredImageSearch {
    fn provider_name(&self) -> &'static str {
        match self {
            ConfiguredImageSearch::Unsplash(_) => "unsplash",
            ConfiguredImageSearch::Google(_) => "google",
            ConfiguredImageSearch::Dalle(_) => "openai",
            ConfiguredImageSearch::Disabled => "none",
        }
    }

    fn is_configured(&self) -> bool {
        !matches!(self, ConfiguredImageSearch::Disabled)
    }

    async fn search_dish_image(&self, query: &DishImageQuery) -> Result<Option<String>, CoreError> {
        match self {
            ConfiguredImageSearch::Unsplash(search) => search.search(query).await,
            ConfiguredImageSearch::Google(search) => search.search(query).await,
            ConfiguredImageSearch::Dalle(generator) => generator.generate(query).await,
            ConfiguredImageSearch::Disabled => Ok(None),
        }
    }
}

/// Shared response handling. 401 and 403 become `ProviderRejected`; other non-2xx
/// statuses and transport failures become `ProviderUnavailable`. Enrichment absorbs both.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    provider: &str,
    result: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, CoreError> {
    let response = result
        .map_err(|e| CoreError::ProviderUnavailable(format!("{provider} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let detail = format!("{provider} returned {status}");
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CoreError::ProviderRejected(detail),
            _ => CoreError::ProviderUnavailable(detail),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CoreError::ProviderUnavailable(format!("{provider} response unreadable: {e}")))
}
