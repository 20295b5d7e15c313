//! Provider abstraction shared by every image source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::imagery::{Dimensions, ImageQuery, ResolutionTarget, ResultGroup};

/// Errors raised inside a provider adapter.
///
/// These never escape [`ImageProvider::search`]; adapters fold them into an
/// empty result. Only constructors return them to callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered 429.
    #[error("Rate limited for provider {provider}, retry in {retry_after_ms}ms")]
    RateLimited {
        provider: String,
        retry_after_ms: u64,
    },

    /// Local request budget is empty; no request was sent.
    #[error("Request budget exhausted for provider {provider}, retry in {retry_after_ms}ms")]
    BudgetExhausted {
        provider: String,
        retry_after_ms: u64,
    },

    #[error("Provider rejected credentials")]
    Unauthorized,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Adapter not configured (missing API key, etc.).
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Rate limit state as seen by one adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitInfo {
    /// Local budget.
    pub requests_per_minute: u32,
    pub tokens_available: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_available_in_ms: Option<u64>,
    /// Quota reported by the provider on its last response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_remaining: Option<u32>,
}

/// Self-reported adapter health. Building it never touches the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl ProviderStatus {
    pub fn available() -> Self {
        Self {
            available: true,
            rate_limit: None,
            last_used: None,
            last_error: None,
        }
    }
}

/// Uniform search capability over one external image source.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Provider name used by the routing table, logs and metrics.
    fn name(&self) -> &str;

    /// Size to ask for when the provider accepts resolution hints.
    fn dimensions_for(&self, target: ResolutionTarget) -> Dimensions {
        target.envelope()
    }

    /// Synthetic sources carry no visual relevance and always run last.
    fn is_synthetic(&self) -> bool {
        false
    }

    /// Search for images matching the query.
    ///
    /// Returns `None` when the provider has nothing to offer, including
    /// network, auth and rate-limit failures.
    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup>;

    /// Current availability and quota.
    async fn status(&self) -> ProviderStatus;
}
