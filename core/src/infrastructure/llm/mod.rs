pub mod anthropic_client;
pub mod openai_client;

use reqwest::{Client, StatusCode};

use crate::domain::{
    common::{VisionConfig, entities::app_errors::CoreError},
    menu_analysis::{
        ports::VisionClient,
        value_objects::{VisionProvider, VisionRequest},
    },
};

pub use anthropic_client::AnthropicVisionClient;
pub use openai_client::OpenAiVisionClient;

/// Vision client chosen by `AI_PROVIDER`.
#[derive(Debug, Clone)]
pub enum ConfiguredVisionClient {
    Anthropic(AnthropicVisionClient),
    OpenAi(OpenAiVisionClient),
}

impl ConfiguredVisionClient {
    pub fn from_config(config: &VisionConfig) -> Result<Self, CoreError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build vision HTTP client");
                CoreError::InternalServerError
            })?;

        let client = match config.provider {
            VisionProvider::Anthropic => ConfiguredVisionClient::Anthropic(
                AnthropicVisionClient::new(http, &config.anthropic, config.max_tokens),
            ),
            VisionProvider::OpenAi => ConfiguredVisionClient::OpenAi(OpenAiVisionClient::new(
                http,
                &config.openai,
                config.max_tokens,
            )),
        };

        tracing::info!(
            provider = %client.provider(),
            model = %client.model(),
            configured = client.is_configured(),
            "Vision client ready"
        );

        Ok(client)
    }
}

impl VisionClient for ConfiguredVisionClient {
    fn provider(&self) -> VisionProvider {
        match self {
            ConfiguredVisionClient::Anthropic(client) => client.provider(),
            ConfiguredVisionClient::OpenAi(client) => client.provider(),
        }
    }

    fn model(&self) -> String {
        match self {
            ConfiguredVisionClient::Anthropic(client) => client.model(),
            ConfiguredVisionClient::OpenAi(client) => client.model(),
        }
    }

    fn is_configured(&self) -> bool {
        match self {
            ConfiguredVisionClient::Anthropic(client) => client.is_configured(),
            ConfiguredVisionClient::OpenAi(client) => client.is_configured(),
        }
    }

    async fn analyze_image(&self, request: &VisionRequest) -> Result<String, CoreError> {
        match self {
            ConfiguredVisionClient::Anthropic(client) => client.analyze_image(request).await,
            ConfiguredVisionClient::OpenAi(client) => client.analyze_image(request).await,
        }
    }
}

/// Auth, quota and bad-request answers are final. Server errors and timeouts
/// are worth one more attempt.
pub(crate) fn classify_status(provider: VisionProvider, status: StatusCode, body: &str) -> CoreError {
    let detail = format!("{provider} returned {status}: {}", excerpt(body));

    if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        CoreError::ProviderUnavailable(detail)
    } else {
        CoreError::ProviderRejected(detail)
    }
}

pub(crate) fn classify_transport(provider: VisionProvider, error: &reqwest::Error) -> CoreError {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };

    CoreError::ProviderUnavailable(format!("{provider} {kind}: {error}"))
}

pub(crate) fn not_configured(provider: VisionProvider, variable: &str) -> CoreError {
    CoreError::ProviderRejected(format!("{provider} API key is not configured ({variable})"))
}

fn excerpt(body: &str) -> &str {
    let body = body.trim();
    match body.char_indices().nth(300) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        let rejected = [
            StatusCode::BAD_REQUEST,
            StatusCode::UNAUTHORIZED,
            StatusCode::PAYMENT_REQUIRED,
            StatusCode::FORBIDDEN,
            StatusCode::NOT_FOUND,
            StatusCode::TOO_MANY_REQUESTS,
        ];
        for status in rejected {
            assert!(matches!(
                classify_status(VisionProvider::OpenAi, status, "{}"),
                CoreError::ProviderRejected(_)
            ));
        }

        let unavailable = [
            StatusCode::REQUEST_TIMEOUT,
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ];
        for status in unavailable {
            assert!(classify_status(VisionProvider::Anthropic, status, "").is_retryable());
        }
    }

    #[test]
    fn test_error_body_is_truncated() {
        let body = "x".repeat(1000);
        let CoreError::ProviderRejected(detail) =
            classify_status(VisionProvider::OpenAi, StatusCode::UNAUTHORIZED, &body)
        else {
            panic!("expected rejection");
        };
        assert!(detail.len() < 400);
        assert!(detail.starts_with("openai returned 401 Unauthorized"));
    }
}
