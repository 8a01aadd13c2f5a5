use reqwest::Client;
use serde::Deserialize;

use crate::domain::{
    common::entities::app_errors::CoreError,
    image_enrichment::value_objects::{DishImageQuery, is_acceptable_image_url},
};
use crate::infrastructure::image_search::{CANDIDATE_RESULTS, read_json};

#[derive(Debug, Clone)]
pub struct UnsplashImageSearch {
    client: Client,
    access_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

impl SearchResponse {
    fn first_acceptable_url(self) -> Option<String> {
        self.results.into_iter().find_map(|photo| {
            [photo.urls.regular, photo.urls.small]
                .into_iter()
                .flatten()
                .find(|url| is_acceptable_image_url(url))
        })
    }
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
    small: Option<String>,
}

impl UnsplashImageSearch {
    pub fn new(client: Client, access_key: String, base_url: &str) -> Self {
        Self {
            client,
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn search(&self, query: &DishImageQuery) -> Result<Option<String>, CoreError> {
        let request = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("query", query.search_text().as_str()),
                ("per_page", CANDIDATE_RESULTS),
                ("orientation", "landscape"),
            ]);

        let response: SearchResponse = read_json("unsplash", request.send().await).await?;

        Ok(response.first_acceptable_url())
    }
}
