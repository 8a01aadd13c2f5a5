use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishImageQuery {
    pub dish_name: String,
    pub cuisine_hint: Option<String>,
}

impl DishImageQuery {
    pub fn new(dish_name: impl Into<String>, cuisine_hint: Option<&str>) -> Self {
        Self {
            dish_name: dish_name.into().trim().to_string(),
            cuisine_hint: cuisine_hint
                .map(str::trim)
                .filter(|hint| !hint.is_empty())
                .map(str::to_string),
        }
    }

    /// Keyword query for photo search engines.
    pub fn search_text(&self) -> String {
        match &self.cuisine_hint {
            Some(hint) => format!("{} {} food", self.dish_name, hint),
            None => format!("{} food", self.dish_name),
        }
    }

    /// Prompt for image generation models.
    pub fn generation_prompt(&self) -> String {
        let cuisine = self
            .cuisine_hint
            .as_deref()
            .map(|hint| format!("{hint} "))
            .unwrap_or_default();

        format!(
            "Professional food photography of {cuisine}{}, appetizing plated dish, overhead view, \
             natural lighting, beautiful presentation on white ceramic plate, restaurant quality, \
             high resolution, photorealistic, no text, no watermark, clean background",
            self.dish_name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentOptions {
    pub concurrency: usize,
    pub per_item_timeout: Duration,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            per_item_timeout: Duration::from_secs(10),
        }
    }
}

/// Only absolute http(s) URLs are attached to dishes.
pub fn is_acceptable_image_url(url: &str) -> bool {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    matches!(rest, Some(host) if !host.is_empty() && !host.starts_with('/'))
        && !url.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_texts_include_cuisine_hint() {
        let query = DishImageQuery::new(" Pad Thai ", Some("Thai"));
        assert_eq!(query.search_text(), "Pad Thai Thai food");
        assert!(
            query
                .generation_prompt()
                .starts_with("Professional food photography of Thai Pad Thai, ")
        );

        let query = DishImageQuery::new("Pad Thai", Some("  "));
        assert_eq!(query.cuisine_hint, None);
        assert_eq!(query.search_text(), "Pad Thai food");
    }

    #[test]
    fn test_acceptable_image_urls() {
        assert!(is_acceptable_image_url("https://images.unsplash.com/photo-1?w=1080"));
        assert!(is_acceptable_image_url("http://example.com/a.png"));
        assert!(!is_acceptable_image_url("ftp://example.com/a.png"));
        assert!(!is_acceptable_image_url("https://"));
        assert!(!is_acceptable_image_url("data:image/png;base64,AAAA"));
        assert!(!is_acceptable_image_url("https://exa mple.com/a.png"));
    }
}
