use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    common::{ProviderEndpoint, entities::app_errors::CoreError},
    menu_analysis::{
        ports::VisionClient,
        value_objects::{VisionProvider, VisionRequest},
    },
};
use crate::infrastructure::llm::{classify_status, classify_transport, not_configured};

#[derive(Debug, Clone)]
pub struct OpenAiVisionClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    response_format: serde_json::Value,
    messages: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiVisionClient {
    pub fn new(client: Client, endpoint: &ProviderEndpoint, max_tokens: u32) -> Self {
        Self {
            client,
            api_key: endpoint.api_key.clone(),
            model: endpoint.model.clone(),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            max_tokens,
        }
    }

    fn build_request<'a>(&'a self, request: &VisionRequest) -> ChatCompletionRequest<'a> {
        let data_uri = format!(
            "data:{};base64,{}",
            request.media_type.mime_type(),
            general_purpose::STANDARD.encode(&request.image)
        );

        ChatCompletionRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            response_format: json!({ "type": "json_object" }),
            messages: vec![json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": request.instruction },
                    { "type": "image_url", "image_url": { "url": data_uri, "detail": "high" } }
                ]
            })],
        }
    }
}

impl VisionClient for OpenAiVisionClient {
    fn provider(&self) -> VisionProvider {
        VisionProvider::OpenAi
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
            .ok_or_else(|| not_configured(provider, "OPENAI_API_KEY"))?;

        tracing::debug!(model = %self.model, bytes = request.image.len(), "Calling OpenAI chat completions API");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
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
            tracing::error!(status = %status, "OpenAI API error");
            return Err(classify_status(provider, status, &body));
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse OpenAI response envelope");
            CoreError::ProviderUnavailable(format!("invalid openai response: {e}"))
        })?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
