use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::{ProviderEndpoint, entities::app_errors::CoreError},
    menu_analysis::{
        ports::VisionClient,
        value_objects::{VisionProvider, VisionRequest},
    },
};
use crate::infrastructure::llm::{classify_status, classify_transport, not_configured};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone)]
pub struct AnthropicVisionClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn into_text(self) -> String {
        self.content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl AnthropicVisionClient {
    pub fn new(client: Client, endpoint: &ProviderEndpoint, max_tokens: u32) -> Self {
        Self {
            client,
            api_key: endpoint.api_key.clone(),
            model: endpoint.model.clone(),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            max_tokens,
        }
    }

    fn build_request<'a>(&'a self, request: &'a VisionRequest) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type: request.media_type.mime_type(),
                            data: general_purpose::STANDARD.encode(&request.image),
                        },
                    },
                    ContentBlock::Text {
                        text: &request.instruction,
                    },
                ],
            }],
        }
    }
}

impl VisionClient for AnthropicVisionClient {
    fn provider(&self) -> VisionProvider {
        VisionProvider::Anthropic
    }

    fn model(&self) -> String {
        self.model.clone()
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn analyze_image(&self, request: &VisionRequest) -> Result<String, CoreError> {
        let provider = self.provider();
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| not_configured(provider, "ANTHROPIC_API_KEY"))?;

        tracing::debug!(model = %self.model, bytes = request.image.len(), "Calling Anthropic messages API");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| classify_transport(provider, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(provider, &e))?;

        if !status.is_success() {
            tracing::error!(status = %status, "Anthropic API error");
            return Err(classify_status(provider, status, &body));
        }

        let envelope: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Anthropic response envelope");
            CoreError::ProviderUnavailable(format!("invalid anthropic response: {e}"))
        })?;

        Ok(envelope.into_text())
    }
}
