use reqwest::Client;
use serde::Deserialize;

use crate::domain::{
    common::entities::app_errors::CoreError,
    image_enrichment::value_objects::{DishImageQuery, is_acceptable_image_url},
};
use crate::infrastructure::image_search::{CANDIDATE_RESULTS, read_json};

/// Google Custom Search restricted to image results.
#[derive(Debug, Clone)]
pub struct GoogleImageSearch {
    client: Client,
    api_key: String,
    engine_id: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: Option<String>,
}

impl SearchResponse {
    fn first_acceptable_url(self) -> Option<String> {
        self.items
            .into_iter()
            .filter_map(|item| item.link)
            .find(|link| is_acceptable_image_url(link))
    }
}

impl GoogleImageSearch {
    pub fn new(client: Client, api_key: String, engine_id: String, base_url: &str) -> Self {
        Self {
            client,
            api_key,
            engine_id,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, query: &DishImageQuery) -> Result<Option<String>, CoreError> {
        let request = self
            .client
            .get(format!("{}/customsearch/v1", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query.search_text().as_str()),
                ("searchType", "image"),
                ("num", CANDIDATE_RESULTS),
                ("safe", "active"),
            ]);

        let response: SearchResponse = read_json("google", request.send().await).await?;

        Ok(response.first_acceptable_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_acceptable_link_wins() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"items":[{"title":"no link"},{"link":"data:image/png;base64,AAAA"},{"link":"https://cdn.example.com/pho.jpg"},{"link":"https://cdn.example.com/other.jpg"}]}"#,
        )
        .unwrap();

        assert_eq!(
            response.first_acceptable_url().as_deref(),
            Some("https://cdn.example.com/pho.jpg")
        );
    }

    #[test]
    fn test_no_items_means_no_image() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.first_acceptable_url(), None);
    }
}
