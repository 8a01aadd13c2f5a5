use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

use crate::domain::menu_analysis::value_objects::VisionProvider;

pub mod entities;
pub mod services;
#[cfg(test)]
pub(crate) mod test_support;

#[derive(Clone, Debug)]
pub struct MenuLensConfig {
    pub vision: VisionConfig,
    pub image_search: ImageSearchConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
    pub app: AppInfo,
}

#[derive(Clone, Debug)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub database_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VisionConfig {
    pub provider: VisionProvider,
    pub anthropic: ProviderEndpoint,
    pub openai: ProviderEndpoint,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct ProviderEndpoint {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSearchProviderKind {
    Unsplash,
    Google,
    OpenAi,
    Disabled,
}

impl ImageSearchProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSearchProviderKind::Unsplash => "unsplash",
            ImageSearchProviderKind::Google => "google",
            ImageSearchProviderKind::OpenAi => "openai",
            ImageSearchProviderKind::Disabled => "none",
        }
    }
}

impl FromStr for ImageSearchProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unsplash" => Ok(ImageSearchProviderKind::Unsplash),
            "google" => Ok(ImageSearchProviderKind::Google),
            "openai" | "dalle" | "dall-e" => Ok(ImageSearchProviderKind::OpenAi),
            "none" | "disabled" | "off" | "" => Ok(ImageSearchProviderKind::Disabled),
            other => Err(format!("unsupported image search provider: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImageSearchConfig {
    pub provider: ImageSearchProviderKind,
    pub unsplash_access_key: Option<String>,
    pub unsplash_base_url: String,
    pub google_api_key: Option<String>,
    pub google_engine_id: Option<String>,
    pub google_base_url: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub concurrency: usize,
    pub per_item_timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub max_upload_size: u64,
}

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub retry_backoff: Duration,
    pub request_timeout: Duration,
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let nanos = now.timestamp_subsec_nanos();
    let timestamp = Timestamp::from_unix(NoContext, seconds, nanos);

    (now, timestamp)
}

pub fn generate_uuid_v7() -> Uuid {
    let (_, timestamp) = generate_timestamp();
    Uuid::new_v7(timestamp)
}

/// Keys that are unset or blank count as not configured.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
