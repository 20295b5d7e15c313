//! Synthetic last-resort adapter.
//!
//! Produces deterministic Lorem Picsum URLs sized exactly to the requested
//! envelope. Never calls out to the network and never runs dry, which is
//! what lets the orchestrator always end a relaxed pass with something.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::imagery::{ImageQuery, ImageResult, ResultGroup};

use super::{names, ImageProvider, ProviderStatus};

const DEFAULT_BASE_URL: &str = "https://picsum.photos";

/// Placeholder adapter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: None,
        }
    }
}

pub struct PlaceholderProvider {
    base_url: String,
}

impl PlaceholderProvider {
    pub fn new(config: PlaceholderConfig) -> Self {
        Self {
            base_url: super::http::base_url(config.base_url.as_deref(), DEFAULT_BASE_URL),
        }
    }

    fn seed(text: &str) -> String {
        let digest = Sha256::digest(text.trim().to_lowercase().as_bytes());
        digest[..6].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[async_trait]
impl ImageProvider for PlaceholderProvider {
    fn name(&self) -> &str {
        names::PLACEHOLDER
    }

    fn is_synthetic(&self) -> bool {
        true
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let envelope = self.dimensions_for(query.resolution_target);
        let seed = Self::seed(&query.text);

        let images = (0..query.effective_count())
            .map(|i| {
                let url = format!(
                    "{}/seed/{}-{}/{}/{}",
                    self.base_url, seed, i, envelope.width, envelope.height
                );
                let mut image = ImageResult::new(names::PLACEHOLDER, url)
                    .with_dimensions(envelope.width, envelope.height);
                image.description = Some(query.text.clone());
                image.attribution = Some("Lorem Picsum placeholder".to_string());
                image
                    .provider_metadata
                    .insert("synthetic".to_string(), "true".to_string());
                image
            })
            .collect();

        Some(ResultGroup::new(names::PLACEHOLDER, query.clone(), images))
    }

    async fn status(&self) -> ProviderStatus {
        ProviderStatus::available()
    }
}
