use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use menulens_core::domain::{
    common::{
        AnalysisConfig, AppInfo, ImageSearchConfig, ImageSearchProviderKind, MenuLensConfig,
        ProviderEndpoint, StorageConfig, VisionConfig, non_blank,
    },
    menu_analysis::value_objects::VisionProvider,
    menu_scan::policies::DEFAULT_MAX_UPLOAD_SIZE,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "menulens-api", version, about = "MenuLens menu photo analysis API")]
pub struct Args {
    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub ai: AiArgs,

    #[command(flatten)]
    pub image_search: ImageSearchArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Accepted for compatibility; nothing is persisted.
    #[arg(long = "database-url", env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct LogArgs {
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "info")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false, action = ArgAction::Set)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "SERVER_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long = "server-root-path", env = "SERVER_ROOT_PATH", default_value = "")]
    pub root_path: String,

    #[arg(
        long = "allowed-origins",
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "http://localhost:3000",
            "http://localhost:8081",
            "http://localhost:19000",
            "http://localhost:19001",
            "http://localhost:19006",
        ]
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long = "server-tls-cert", env = "SERVER_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    #[arg(long = "server-tls-key", env = "SERVER_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    #[arg(long = "metrics-enabled", env = "METRICS_ENABLED", default_value_t = false, action = ArgAction::Set)]
    pub metrics_enabled: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AiArgs {
    #[arg(id = "ai_provider", long = "ai-provider", env = "AI_PROVIDER", default_value = "openai")]
    pub provider: VisionProvider,

    #[arg(long = "anthropic-api-key", env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    #[arg(long = "anthropic-model", env = "ANTHROPIC_MODEL", default_value = "claude-3-5-sonnet-20241022")]
    pub anthropic_model: String,

    #[arg(long = "anthropic-base-url", env = "ANTHROPIC_BASE_URL", default_value = "https://api.anthropic.com")]
    pub anthropic_base_url: String,

    #[arg(long = "openai-api-key", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long = "openai-model", env = "OPENAI_MODEL", default_value = "gpt-4o")]
    pub openai_model: String,

    #[arg(long = "openai-base-url", env = "OPENAI_BASE_URL", default_value = "https://api.openai.com")]
    pub openai_base_url: String,

    #[arg(long = "vision-max-tokens", env = "VISION_MAX_TOKENS", default_value_t = 4000)]
    pub max_tokens: u32,

    #[arg(id = "vision_timeout_secs", long = "vision-timeout-secs", env = "VISION_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    #[arg(long = "provider-retry-backoff-ms", env = "PROVIDER_RETRY_BACKOFF_MS", default_value_t = 500)]
    pub retry_backoff_ms: u64,

    #[arg(long = "analyze-timeout-secs", env = "ANALYZE_TIMEOUT_SECS", default_value_t = 120)]
    pub analyze_timeout_secs: u64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ImageSearchArgs {
    #[arg(
        id = "image_search_provider",
        long = "image-search-provider",
        env = "IMAGE_SEARCH_PROVIDER",
        default_value = "unsplash"
    )]
    pub provider: ImageSearchProviderKind,

    #[arg(long = "unsplash-access-key", env = "UNSPLASH_ACCESS_KEY", hide_env_values = true)]
    pub unsplash_access_key: Option<String>,

    #[arg(long = "unsplash-base-url", env = "UNSPLASH_BASE_URL", default_value = "https://api.unsplash.com")]
    pub unsplash_base_url: String,

    #[arg(long = "google-search-api-key", env = "GOOGLE_SEARCH_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    #[arg(long = "google-search-engine-id", env = "GOOGLE_SEARCH_ENGINE_ID")]
    pub google_engine_id: Option<String>,

    #[arg(long = "google-search-base-url", env = "GOOGLE_SEARCH_BASE_URL", default_value = "https://www.googleapis.com")]
    pub google_base_url: String,

    #[arg(long = "enrichment-concurrency", env = "ENRICHMENT_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Per-dish lookup limit. Defaults to 10s for search providers and 60s for DALL-E
    /// generation.
    #[arg(id = "enrichment_timeout_secs", long = "enrichment-timeout-secs", env = "ENRICHMENT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

const SEARCH_TIMEOUT_SECS: u64 = 10;
const GENERATION_TIMEOUT_SECS: u64 = 60;

impl ImageSearchArgs {
    pub fn per_item_timeout(&self) -> Duration {
        let default = match self.provider {
            ImageSearchProviderKind::OpenAi => GENERATION_TIMEOUT_SECS,
            _ => SEARCH_TIMEOUT_SECS,
        };
        Duration::from_secs(self.timeout_secs.unwrap_or(default))
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct StorageArgs {
    #[arg(long = "upload-dir", env = "UPLOAD_DIR", default_value = "./uploads")]
    pub upload_dir: PathBuf,

    #[arg(long = "max-upload-size", env = "MAX_UPLOAD_SIZE", default_value_t = DEFAULT_MAX_UPLOAD_SIZE)]
    pub max_upload_size: u64,
}

impl From<Args> for MenuLensConfig {
    fn from(args: Args) -> Self {
        let openai_api_key = non_blank(args.ai.openai_api_key);
        let per_item_timeout = args.image_search.per_item_timeout();

        MenuLensConfig {
            vision: VisionConfig {
                provider: args.ai.provider,
                anthropic: ProviderEndpoint {
                    api_key: non_blank(args.ai.anthropic_api_key),
                    model: args.ai.anthropic_model,
                    base_url: args.ai.anthropic_base_url,
                },
                openai: ProviderEndpoint {
                    api_key: openai_api_key.clone(),
                    model: args.ai.openai_model,
                    base_url: args.ai.openai_base_url.clone(),
                },
                max_tokens: args.ai.max_tokens,
                timeout: Duration::from_secs(args.ai.timeout_secs),
            },
            image_search: ImageSearchConfig {
                provider: args.image_search.provider,
                unsplash_access_key: non_blank(args.image_search.unsplash_access_key),
                unsplash_base_url: args.image_search.unsplash_base_url,
                google_api_key: non_blank(args.image_search.google_api_key),
                google_engine_id: non_blank(args.image_search.google_engine_id),
                google_base_url: args.image_search.google_base_url,
                openai_api_key,
                openai_base_url: args.ai.openai_base_url,
                concurrency: args.image_search.concurrency,
                per_item_timeout,
            },
            storage: StorageConfig {
                upload_dir: args.storage.upload_dir,
                max_upload_size: args.storage.max_upload_size,
            },
            analysis: AnalysisConfig {
                retry_backoff: Duration::from_millis(args.ai.retry_backoff_ms),
                request_timeout: Duration::from_secs(args.ai.analyze_timeout_secs),
            },
            app: AppInfo {
                name: "MenuLens API".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                database_url: non_blank(args.database_url),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_argument_ids_are_unique() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_providers_parse_independently() {
        let args = Args::parse_from([
            "menulens-api",
            "--ai-provider",
            "anthropic",
            "--image-search-provider",
            "google",
            "--vision-timeout-secs",
            "45",
            "--enrichment-timeout-secs",
            "7",
        ]);

        assert_eq!(args.ai.provider, VisionProvider::Anthropic);
        assert_eq!(args.image_search.provider, ImageSearchProviderKind::Google);
        assert_eq!(args.ai.timeout_secs, 45);
        assert_eq!(args.image_search.per_item_timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_generation_gets_a_longer_default_timeout() {
        let search = Args::parse_from(["menulens-api", "--image-search-provider", "unsplash"]);
        assert_eq!(search.image_search.per_item_timeout(), Duration::from_secs(10));

        let generation = Args::parse_from(["menulens-api", "--image-search-provider", "openai"]);
        assert_eq!(
            MenuLensConfig::from(generation).image_search.per_item_timeout,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_flags_map_into_core_config() {
        let args = Args::parse_from([
            "menulens-api",
            "--ai-provider",
            "anthropic",
            "--anthropic-api-key",
            "sk-ant-test",
            "--image-search-provider",
            "none",
            "--upload-dir",
            "/tmp/menulens-uploads",
            "--max-upload-size",
            "2048",
            "--analyze-timeout-secs",
            "30",
        ]);

        let config = MenuLensConfig::from(args);

        assert_eq!(config.vision.provider, VisionProvider::Anthropic);
        assert_eq!(config.vision.anthropic.api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(config.image_search.provider, ImageSearchProviderKind::Disabled);
        assert_eq!(config.storage.max_upload_size, 2048);
        assert_eq!(config.analysis.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_unknown_provider_is_refused() {
        let parsed = Args::try_parse_from(["menulens-api", "--ai-provider", "gemini"]);
        assert!(parsed.is_err());
    }
}
