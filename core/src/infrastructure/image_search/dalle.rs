use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::{
    common::entities::app_errors::CoreError, image_enrichment::value_objects::DishImageQuery,
};
use crate::infrastructure::image_search::read_json;

/// Generates a dish photo with DALL-E 3 instead of searching for one.
#[derive(Debug, Clone)]
pub struct DalleImageGenerator {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model: &'static str,
    prompt: String,
    size: &'static str,
    quality: &'static str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

impl DalleImageGenerator {
    pub fn new(client: Client, api_key: String, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_request(query: &DishImageQuery) -> GenerationRequest {
        GenerationRequest {
            model: "dall-e-3",
            prompt: query.generation_prompt(),
            size: "1024x1024",
            quality: "standard",
            n: 1,
        }
    }

    pub async fn generate(&self, query: &DishImageQuery) -> Result<Option<String>, CoreError> {
        tracing::debug!(dish = %query.dish_name, "Generating dish image");

        let request = self
            .client
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&Self::build_request(query));

        let response: GenerationResponse = read_json("openai", request.send().await).await?;

        Ok(response.data.into_iter().find_map(|image| image.url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_request_shape() {
        let query = DishImageQuery::new("Margherita Pizza", Some("Italian"));

        let body = serde_json::to_value(DalleImageGenerator::build_request(&query)).unwrap();

        assert_eq!(body["model"], "dall-e-3");
        assert_eq!(body["size"], "1024x1024");
        assert_eq!(body["n"], 1);
        assert!(
            body["prompt"]
                .as_str()
                .unwrap()
                .contains("Italian Margherita Pizza")
        );
    }
}
