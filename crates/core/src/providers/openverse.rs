//! Openverse adapter.
//!
//! Anonymous access works with a low quota; a bearer token raises it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::imagery::{ImageQuery, ImageResult, ResultGroup};

use super::http::{self, check_status, default_timeout_secs};
use super::tracker::ProviderTracker;
use super::{names, ImageProvider, ProviderError, ProviderStatus, OVERSAMPLE};

const DEFAULT_BASE_URL: &str = "https://api.openverse.org";
const MAX_PAGE_SIZE: u32 = 20;

/// Openverse adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenverseConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Optional OAuth access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_rpm")]
    pub rate_limit_rpm: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_rpm() -> u32 {
    20
}

impl Default for OpenverseConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            api_token: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
            rate_limit_rpm: default_rpm(),
        }
    }
}

pub struct OpenverseProvider {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    tracker: ProviderTracker,
}

impl OpenverseProvider {
    pub fn new(config: OpenverseConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(config.timeout_secs, http::USER_AGENT)?,
            base_url: http::base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            api_token: config.api_token.filter(|t| !t.trim().is_empty()),
            tracker: ProviderTracker::new(names::OPENVERSE, config.rate_limit_rpm),
        })
    }

    async fn fetch(&self, query: &ImageQuery) -> Result<Vec<ImageResult>, ProviderError> {
        self.tracker.acquire().await?;

        let page_size = query
            .effective_count()
            .saturating_mul(OVERSAMPLE)
            .min(MAX_PAGE_SIZE)
            .to_string();

        let mut request = self
            .client
            .get(format!("{}/v1/images/", self.base_url))
            .query(&[
                ("q", query.text.as_str()),
                ("page_size", page_size.as_str()),
                ("size", "large"),
                ("aspect_ratio", "wide"),
                ("mature", "false"),
            ]);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        self.tracker.record_headers(response.headers()).await;
        let response = check_status(self.name(), response).await?;

        let body: OpenverseResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Openverse response: {}", e))
        })?;

        Ok(body.results.into_iter().map(ImageResult::from).collect())
    }
}

#[async_trait]
impl ImageProvider for OpenverseProvider {
    fn name(&self) -> &str {
        names::OPENVERSE
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let result = self.fetch(query).await;
        self.tracker.settle(query, result).await
    }

    async fn status(&self) -> ProviderStatus {
        self.tracker.status().await
    }
}

// Openverse API response types

#[derive(Debug, Deserialize)]
struct OpenverseResponse {
    #[serde(default)]
    results: Vec<OpenverseImage>,
}

#[derive(Debug, Deserialize)]
struct OpenverseImage {
    id: String,
    url: String,
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    attribution: Option<String>,
    license: Option<String>,
    source: Option<String>,
    foreign_landing_url: Option<String>,
}

impl From<OpenverseImage> for ImageResult {
    fn from(item: OpenverseImage) -> Self {
        let mut image = ImageResult::new(names::OPENVERSE, item.url);
        // Openverse omits dimensions for some sources; the gate decides what that means.
        image.width = item.width;
        image.height = item.height;
        image.description = item.title;
        image.attribution = item.attribution;
        image.provider_metadata.insert("id".to_string(), item.id);
        if let Some(license) = item.license {
            image.provider_metadata.insert("license".to_string(), license);
        }
        if let Some(source) = item.source {
            image.provider_metadata.insert("source".to_string(), source);
        }
        if let Some(page) = item.foreign_landing_url {
            image.provider_metadata.insert("page_url".to_string(), page);
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_map_image() {
        let json = r#"{
            "result_count": 2,
            "results": [
                {
                    "id": "f9384235-b72e-4f1e-9b05-e1b116262a29",
                    "title": "Roman Forum",
                    "url": "https://live.staticflickr.com/65535/51234_o.jpg",
                    "width": 4000,
                    "height": 2250,
                    "license": "by",
                    "source": "flickr",
                    "attribution": "\"Roman Forum\" by jdoe is licensed under CC BY 2.0.",
                    "foreign_landing_url": "https://www.flickr.com/photos/jdoe/51234"
                },
                {
                    "id": "0aff3595-8168-440b-83ff-7a80b65dea42",
                    "url": "https://example.org/unknown-size.jpg"
                }
            ]
        }"#;

        let parsed: OpenverseResponse = serde_json::from_str(json).unwrap();
        let images: Vec<ImageResult> = parsed.results.into_iter().map(ImageResult::from).collect();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].width, Some(4000));
        assert_eq!(images[0].description.as_deref(), Some("Roman Forum"));
        assert_eq!(images[0].provider_metadata.get("source").unwrap(), "flickr");
        assert!(images[1].dimensions().is_none());
        assert!(images[1].attribution.is_none());
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let provider = OpenverseProvider::new(OpenverseConfig {
            api_token: Some(" ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(provider.api_token.is_none());
    }
}
