//! Per-adapter bookkeeping behind `status()`.

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use tokio::sync::{Mutex, RwLock};
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::imagery::{ImageQuery, ImageResult, ResultGroup};

use super::rate_limiter::TokenBucket;
use super::{ProviderError, ProviderStatus, RateLimitInfo};

#[derive(Debug, Default)]
struct TrackerState {
    last_used: Option<DateTime<Utc>>,
    last_error: Option<String>,
    upstream_limit: Option<u32>,
    upstream_remaining: Option<u32>,
    /// Set by an upstream 429, cleared by the next success.
    blocked_until: Option<Instant>,
}

impl TrackerState {
    fn blocked_for(&self, now: Instant) -> Option<Duration> {
        self.blocked_until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }
}

/// Local request budget plus the last observed provider state.
///
/// Only diagnostics live here; search results never depend on it beyond
/// the local budget check.
#[derive(Debug)]
pub struct ProviderTracker {
    provider: String,
    bucket: Mutex<TokenBucket>,
    state: RwLock<TrackerState>,
}

impl ProviderTracker {
    pub fn new(provider: impl Into<String>, requests_per_minute: u32) -> Self {
        Self {
            provider: provider.into(),
            bucket: Mutex::new(TokenBucket::new(requests_per_minute)),
            state: RwLock::new(TrackerState::default()),
        }
    }

    /// Take one request from the local budget.
    pub async fn acquire(&self) -> Result<(), ProviderError> {
        let mut bucket = self.bucket.lock().await;
        bucket
            .try_acquire()
            .map_err(|wait| ProviderError::BudgetExhausted {
                provider: self.provider.clone(),
                retry_after_ms: wait.as_millis() as u64,
            })
    }

    /// Remember quota headers from the latest provider response.
    ///
    /// A response without quota headers clears the previous reading.
    pub async fn record_headers(&self, headers: &HeaderMap) {
        let mut state = self.state.write().await;
        state.upstream_limit = header_u32(headers, "x-ratelimit-limit");
        state.upstream_remaining = header_u32(headers, "x-ratelimit-remaining");
    }

    /// Turn an adapter call into the engine contract: images or nothing.
    pub async fn settle(
        &self,
        query: &ImageQuery,
        result: Result<Vec<ImageResult>, ProviderError>,
    ) -> Option<ResultGroup> {
        let mut state = self.state.write().await;
        state.last_used = Some(Utc::now());

        match result {
            Ok(images) if images.is_empty() => {
                state.last_error = None;
                state.blocked_until = None;
                debug!(provider = %self.provider, query = %query.text, "Provider returned no images");
                None
            }
            Ok(images) => {
                state.last_error = None;
                state.blocked_until = None;
                debug!(
                    provider = %self.provider,
                    images = images.len(),
                    "Provider search complete"
                );
                Some(ResultGroup::new(self.provider.clone(), query.clone(), images))
            }
            Err(e) => {
                warn!(provider = %self.provider, error = %e, "Provider search failed");
                if let ProviderError::RateLimited { retry_after_ms, .. } = &e {
                    state.blocked_until =
                        Some(Instant::now() + Duration::from_millis(*retry_after_ms));
                }
                state.last_error = Some(e.to_string());
                None
            }
        }
    }

    pub async fn status(&self) -> ProviderStatus {
        let bucket = self.bucket.lock().await.status();
        let state = self.state.read().await;
        let blocked_for = state.blocked_for(Instant::now());

        let available = bucket.tokens_available >= 1.0
            && state.upstream_remaining != Some(0)
            && blocked_for.is_none();
        let next_available_in_ms = match (bucket.next_available_in_ms, blocked_for) {
            (local, None) => local,
            (local, Some(blocked)) => {
                Some(local.unwrap_or(0).max(blocked.as_millis() as u64))
            }
        };

        ProviderStatus {
            available,
            rate_limit: Some(RateLimitInfo {
                requests_per_minute: bucket.requests_per_minute,
                tokens_available: bucket.tokens_available,
                next_available_in_ms,
                upstream_limit: state.upstream_limit,
                upstream_remaining: state.upstream_remaining,
            }),
            last_used: state.last_used,
            last_error: state.last_error.clone(),
        }
    }
}

fn header_u32(headers: &HeaderMap, name: &str) -> Option<u32> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
