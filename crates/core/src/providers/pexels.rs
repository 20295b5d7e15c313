//! Pexels search adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::imagery::{ImageQuery, ImageResult, ResultGroup};

use super::http::{self, check_status, default_timeout_secs};
use super::tracker::ProviderTracker;
use super::{names, ImageProvider, ProviderError, ProviderStatus, OVERSAMPLE};

const DEFAULT_BASE_URL: &str = "https://api.pexels.com/v1";
const MAX_PER_PAGE: u32 = 80;

/// Pexels adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PexelsConfig {
    /// Pexels API key (required).
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_rpm")]
    pub rate_limit_rpm: u32,
}

fn default_rpm() -> u32 {
    30
}

pub struct PexelsProvider {
    client: Client,
    base_url: String,
    api_key: String,
    tracker: ProviderTracker,
}

impl PexelsProvider {
    pub fn new(config: PexelsConfig) -> Result<Self, ProviderError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Pexels API key is required".to_string(),
            ));
        }

        Ok(Self {
            client: http::build_client(config.timeout_secs, http::USER_AGENT)?,
            base_url: http::base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            api_key: config.api_key,
            tracker: ProviderTracker::new(names::PEXELS, config.rate_limit_rpm),
        })
    }

    async fn fetch(&self, query: &ImageQuery) -> Result<Vec<ImageResult>, ProviderError> {
        self.tracker.acquire().await?;

        let per_page = query
            .effective_count()
            .saturating_mul(OVERSAMPLE)
            .min(MAX_PER_PAGE)
            .to_string();

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query.text.as_str()),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
                ("size", "large"),
            ])
            .send()
            .await?;

        self.tracker.record_headers(response.headers()).await;
        let response = check_status(self.name(), response).await?;

        let body: PexelsSearchResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Pexels response: {}", e))
        })?;

        Ok(body.photos.into_iter().map(ImageResult::from).collect())
    }
}

#[async_trait]
impl ImageProvider for PexelsProvider {
    fn name(&self) -> &str {
        names::PEXELS
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let result = self.fetch(query).await;
        self.tracker.settle(query, result).await
    }

    async fn status(&self) -> ProviderStatus {
        self.tracker.status().await
    }
}

// Pexels API response types

#[derive(Debug, Deserialize)]
struct PexelsSearchResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    id: u64,
    width: u32,
    height: u32,
    url: Option<String>,
    photographer: Option<String>,
    photographer_url: Option<String>,
    alt: Option<String>,
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    original: String,
}

impl From<PexelsPhoto> for ImageResult {
    fn from(photo: PexelsPhoto) -> Self {
        let mut image = ImageResult::new(names::PEXELS, photo.src.original)
            .with_dimensions(photo.width, photo.height);
        image.description = photo.alt.filter(|a| !a.is_empty());
        image.attribution = photo
            .photographer
            .map(|p| format!("Photo by {} on Pexels", p));
        image
            .provider_metadata
            .insert("id".to_string(), photo.id.to_string());
        if let Some(page) = photo.url {
            image.provider_metadata.insert("page_url".to_string(), page);
        }
        if let Some(author) = photo.photographer_url {
            image
                .provider_metadata
                .insert("author_url".to_string(), author);
        }
        image
    }
}
