//! Pixabay search adapter.
//!
//! Pixabay only exposes the original file (`imageURL`) to accounts with full
//! API access. Everyone else gets size-capped renditions, so the reported
//! dimensions are scaled to whichever rendition is actually returned.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::imagery::{Dimensions, ImageQuery, ImageResult, ResultGroup};

use super::http::{self, check_status, default_timeout_secs};
use super::tracker::ProviderTracker;
use super::{names, ImageProvider, ProviderError, ProviderStatus, OVERSAMPLE};

const DEFAULT_BASE_URL: &str = "https://pixabay.com/api";
const MIN_PER_PAGE: u32 = 3;
const MAX_PER_PAGE: u32 = 200;
const MAX_QUERY_CHARS: usize = 100;
const FULL_HD_WIDTH: u32 = 1920;
const LARGE_WIDTH: u32 = 1280;

/// Pixabay adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixabayConfig {
    /// Pixabay API key (required).
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_rpm")]
    pub rate_limit_rpm: u32,
}

fn default_rpm() -> u32 {
    100
}

pub struct PixabayProvider {
    client: Client,
    base_url: String,
    api_key: String,
    tracker: ProviderTracker,
}

impl PixabayProvider {
    pub fn new(config: PixabayConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Pixabay API key is required".to_string(),
            ));
        }

        Ok(Self {
            client: http::build_client(config.timeout_secs, http::USER_AGENT)?,
            base_url: http::base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            api_key: config.api_key,
            tracker: ProviderTracker::new(names::PIXABAY, config.rate_limit_rpm),
        })
    }

    async fn fetch(&self, query: &ImageQuery) -> Result<Vec<ImageResult>, ProviderError> {
        self.tracker.acquire().await?;

        let envelope = self.dimensions_for(query.resolution_target);
        let text: String = query.text.chars().take(MAX_QUERY_CHARS).collect();
        let per_page = query
            .effective_count()
            .saturating_mul(OVERSAMPLE)
            .clamp(MIN_PER_PAGE, MAX_PER_PAGE)
            .to_string();
        let min_width = envelope.width.to_string();
        let min_height = envelope.height.to_string();

        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", text.as_str()),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("safesearch", "true"),
                ("per_page", per_page.as_str()),
                ("min_width", min_width.as_str()),
                ("min_height", min_height.as_str()),
            ])
            .send()
            .await?;

        self.tracker.record_headers(response.headers()).await;
        let response = check_status(self.name(), response).await?;

        let body: PixabayResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Pixabay response: {}", e))
        })?;

        Ok(body.hits.into_iter().map(ImageResult::from).collect())
    }
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    fn name(&self) -> &str {
        names::PIXABAY
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let result = self.fetch(query).await;
        self.tracker.settle(query, result).await
    }

    async fn status(&self) -> ProviderStatus {
        self.tracker.status().await
    }
}

// Pixabay API response types

#[derive(Debug, Deserialize)]
struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PixabayHit {
    id: u64,
    #[serde(rename = "pageURL")]
    page_url: Option<String>,
    tags: Option<String>,
    #[serde(rename = "largeImageURL")]
    large_image_url: String,
    #[serde(rename = "fullHDURL")]
    full_hd_url: Option<String>,
    #[serde(rename = "imageURL")]
    image_url: Option<String>,
    image_width: u32,
    image_height: u32,
    user: Option<String>,
}

impl From<PixabayHit> for ImageResult {
    fn from(hit: PixabayHit) -> Self {
        let original = Dimensions::new(hit.image_width, hit.image_height);
        let (url, delivered) = match (hit.image_url, hit.full_hd_url) {
            (Some(url), _) => (url, original),
            (None, Some(url)) => (url, original.scaled_to_width(FULL_HD_WIDTH)),
            (None, None) => (
                hit.large_image_url,
                original.scaled_to_width(LARGE_WIDTH),
            ),
        };

        let mut image = ImageResult::new(names::PIXABAY, url)
            .with_dimensions(delivered.width, delivered.height);
        image.description = hit.tags;
        image.attribution = hit.user.map(|u| format!("Image by {} from Pixabay", u));
        image
            .provider_metadata
            .insert("id".to_string(), hit.id.to_string());
        if let Some(page) = hit.page_url {
            image.provider_metadata.insert("page_url".to_string(), page);
        }
        image
    }
}
