//! Unsplash search adapter.
//!
//! Requires an access key. Demo applications get 50 requests per hour;
//! quota is reported through `X-Ratelimit-*` headers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::imagery::{Dimensions, ImageQuery, ImageResult, ResultGroup};

use super::http::{self, check_status, default_timeout_secs};
use super::tracker::ProviderTracker;
use super::{names, ImageProvider, ProviderError, ProviderStatus, OVERSAMPLE};

const DEFAULT_BASE_URL: &str = "https://api.unsplash.com";
const MAX_PER_PAGE: u32 = 30;

/// Unsplash adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    /// Unsplash access key (required).
    pub access_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_rpm")]
    pub rate_limit_rpm: u32,
}

fn default_rpm() -> u32 {
    20
}

pub struct UnsplashProvider {
    client: Client,
    base_url: String,
    access_key: String,
    tracker: ProviderTracker,
}

impl UnsplashProvider {
    pub fn new(config: UnsplashConfig) -> Result<Self, ProviderError> {
        if config.access_key.trim().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Unsplash access key is required".to_string(),
            ));
        }

        Ok(Self {
            client: http::build_client(config.timeout_secs, http::USER_AGENT)?,
            base_url: http::base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            access_key: config.access_key,
            tracker: ProviderTracker::new(names::UNSPLASH, config.rate_limit_rpm),
        })
    }

    async fn fetch(&self, query: &ImageQuery) -> Result<Vec<ImageResult>, ProviderError> {
        self.tracker.acquire().await?;

        let envelope = self.dimensions_for(query.resolution_target);
        let per_page = query
            .effective_count()
            .saturating_mul(OVERSAMPLE)
            .min(MAX_PER_PAGE)
            .to_string();

        let response = self
            .client
            .get(format!("{}/search/photos", self.base_url))
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query.text.as_str()),
                ("per_page", per_page.as_str()),
                ("orientation", "landscape"),
                ("content_filter", "high"),
            ])
            .send()
            .await?;

        self.tracker.record_headers(response.headers()).await;
        let response = check_status(self.name(), response).await?;

        let body: UnsplashSearchResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Unsplash response: {}", e))
        })?;

        Ok(body
            .results
            .into_iter()
            .map(|photo| photo.into_image(envelope))
            .collect())
    }
}

#[async_trait]
impl ImageProvider for UnsplashProvider {
    fn name(&self) -> &str {
        names::UNSPLASH
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let result = self.fetch(query).await;
        self.tracker.settle(query, result).await
    }

    async fn status(&self) -> ProviderStatus {
        self.tracker.status().await
    }
}

// Unsplash API response types

#[derive(Debug, Deserialize)]
struct UnsplashSearchResponse {
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    id: String,
    width: u32,
    height: u32,
    description: Option<String>,
    alt_description: Option<String>,
    urls: UnsplashUrls,
    links: Option<UnsplashLinks>,
    user: Option<UnsplashUser>,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    raw: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashLinks {
    html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnsplashUser {
    name: String,
}

impl UnsplashPhoto {
    /// The raw URL is resized on Unsplash's CDN to the envelope width.
    fn into_image(self, envelope: Dimensions) -> ImageResult {
        let delivered = Dimensions::new(self.width, self.height).scaled_to_width(envelope.width);
        let separator = if self.urls.raw.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}w={}&fit=max&q=85",
            self.urls.raw, separator, delivered.width
        );

        let mut image = ImageResult::new(names::UNSPLASH, url)
            .with_dimensions(delivered.width, delivered.height);
        image.download_url = self.urls.raw;
        image.description = self.description.or(self.alt_description);
        image.attribution = self
            .user
            .map(|u| format!("Photo by {} on Unsplash", u.name));
        image
            .provider_metadata
            .insert("id".to_string(), self.id);
        if let Some(html) = self.links.and_then(|l| l.html) {
            image.provider_metadata.insert("page_url".to_string(), html);
        }
        image
    }
}
