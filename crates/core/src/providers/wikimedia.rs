//! Wikimedia Commons adapter.
//!
//! Uses the MediaWiki action API with a file-namespace search generator.
//! Commons asks every client to send a descriptive User-Agent with contact
//! details, so the configured one is passed through as-is.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::imagery::{ImageQuery, ImageResult, ResultGroup};

use super::http::{self, check_status, default_timeout_secs};
use super::tracker::ProviderTracker;
use super::{names, ImageProvider, ProviderError, ProviderStatus, OVERSAMPLE};

const DEFAULT_BASE_URL: &str = "https://commons.wikimedia.org";
const MAX_LIMIT: u32 = 50;
const ACCEPTED_MIME: &[&str] = &["image/jpeg", "image/png", "image/webp"];

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));

/// Wikimedia Commons adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikimediaConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Sent verbatim; include a contact address for production use.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u32,
    #[serde(default = "default_rpm")]
    pub rate_limit_rpm: u32,
}

fn default_enabled() -> bool {
    true
}

fn default_user_agent() -> String {
    http::USER_AGENT.to_string()
}

fn default_rpm() -> u32 {
    60
}

impl Default for WikimediaConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            rate_limit_rpm: default_rpm(),
        }
    }
}

pub struct WikimediaProvider {
    client: Client,
    base_url: String,
    tracker: ProviderTracker,
}

impl WikimediaProvider {
    pub fn new(config: WikimediaConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(config.timeout_secs, &config.user_agent)?,
            base_url: http::base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
            tracker: ProviderTracker::new(names::WIKIMEDIA, config.rate_limit_rpm),
        })
    }

    async fn fetch(&self, query: &ImageQuery) -> Result<Vec<ImageResult>, ProviderError> {
        self.tracker.acquire().await?;

        let search = format!("{} filetype:bitmap", query.text);
        let limit = query
            .effective_count()
            .saturating_mul(OVERSAMPLE)
            .min(MAX_LIMIT)
            .to_string();

        let response = self
            .client
            .get(format!("{}/w/api.php", self.base_url))
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("generator", "search"),
                ("gsrsearch", search.as_str()),
                ("gsrnamespace", "6"),
                ("gsrlimit", limit.as_str()),
                ("prop", "imageinfo"),
                ("iiprop", "url|size|mime|extmetadata"),
                ("iiextmetadatafilter", "Artist|LicenseShortName|ImageDescription"),
            ])
            .send()
            .await?;

        let response = check_status(self.name(), response).await?;

        let body: WikimediaResponse = response.json().await.map_err(|e| {
            ProviderError::ParseError(format!("Failed to parse Wikimedia response: {}", e))
        })?;

        Ok(body.into_images())
    }
}

#[async_trait]
impl ImageProvider for WikimediaProvider {
    fn name(&self) -> &str {
        names::WIKIMEDIA
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let result = self.fetch(query).await;
        self.tracker.settle(query, result).await
    }

    async fn status(&self) -> ProviderStatus {
        self.tracker.status().await
    }
}

fn strip_html(value: &str) -> String {
    HTML_TAG.replace_all(value, "").trim().to_string()
}

// MediaWiki API response types (formatversion=2)

#[derive(Debug, Deserialize)]
struct WikimediaResponse {
    /// Absent when the search matched nothing.
    query: Option<WikimediaQuery>,
}

#[derive(Debug, Deserialize)]
struct WikimediaQuery {
    #[serde(default)]
    pages: Vec<WikimediaPage>,
}

#[derive(Debug, Deserialize)]
struct WikimediaPage {
    pageid: Option<u64>,
    title: String,
    /// Search rank; pages are not returned in rank order.
    #[serde(default)]
    index: u32,
    #[serde(default)]
    imageinfo: Vec<WikimediaImageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WikimediaImageInfo {
    url: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    mime: Option<String>,
    descriptionurl: Option<String>,
    #[serde(default)]
    extmetadata: Option<ExtMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ExtMetadata {
    artist: Option<ExtValue>,
    license_short_name: Option<ExtValue>,
    image_description: Option<ExtValue>,
}

#[derive(Debug, Deserialize)]
struct ExtValue {
    value: String,
}

impl WikimediaResponse {
    fn into_images(self) -> Vec<ImageResult> {
        let Some(query) = self.query else {
            return Vec::new();
        };

        let mut pages = query.pages;
        pages.sort_by_key(|p| p.index);

        pages
            .into_iter()
            .filter_map(|page| {
                let info = page.imageinfo.into_iter().next()?;
                let mime_ok = info
                    .mime
                    .as_deref()
                    .map(|m| ACCEPTED_MIME.contains(&m))
                    .unwrap_or(false);
                if !mime_ok {
                    return None;
                }
                Some(info.into_image(page.pageid, &page.title))
            })
            .collect()
    }
}

impl WikimediaImageInfo {
    fn into_image(self, pageid: Option<u64>, title: &str) -> ImageResult {
        let meta = self.extmetadata.unwrap_or_default();

        let mut image =
            ImageResult::new(names::WIKIMEDIA, self.url).with_dimensions(self.width, self.height);
        image.description = meta
            .image_description
            .map(|d| strip_html(&d.value))
            .filter(|d| !d.is_empty())
            .or_else(|| Some(title.trim_start_matches("File:").to_string()));

        let artist = meta
            .artist
            .map(|a| strip_html(&a.value))
            .filter(|a| !a.is_empty());
        let license = meta.license_short_name.map(|l| l.value);
        image.attribution = match (artist, license.as_deref()) {
            (Some(artist), Some(license)) => Some(format!("{} ({}), via Wikimedia Commons", artist, license)),
            (Some(artist), None) => Some(format!("{}, via Wikimedia Commons", artist)),
            (None, Some(license)) => Some(format!("{}, via Wikimedia Commons", license)),
            (None, None) => None,
        };

        image
            .provider_metadata
            .insert("title".to_string(), title.to_string());
        if let Some(id) = pageid {
            image
                .provider_metadata
                .insert("pageid".to_string(), id.to_string());
        }
        if let Some(page) = self.descriptionurl {
            image.provider_metadata.insert("page_url".to_string(), page);
        }
        if let Some(license) = license {
            image.provider_metadata.insert("license".to_string(), license);
        }
        image
    }
}
