//! Mock image provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::imagery::{ImageQuery, ImageResult, ResultGroup};
use crate::providers::{ImageProvider, ProviderStatus};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The query that was searched.
    pub query: ImageQuery,
    /// When the search was made, on tokio's clock.
    pub timestamp: Instant,
}

/// Mock implementation of the ImageProvider trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable images
/// - Track searches for call-count assertions
/// - Simulate an unreachable provider
///
/// # Example
///
/// ```rust,ignore
/// use imagebus_core::testing::{fixtures, MockProvider};
///
/// let unsplash = Arc::new(
///     MockProvider::new("unsplash").with_images(fixtures::images("unsplash", 3, 3000, 2000)),
/// );
///
/// let group = unsplash.search(&ImageQuery::new("rome")).await.unwrap();
/// assert_eq!(group.images.len(), 3);
/// assert_eq!(unsplash.call_count().await, 1);
/// ```
pub struct MockProvider {
    name: String,
    synthetic: bool,
    /// Images returned on every search.
    images: Arc<RwLock<Vec<ImageResult>>>,
    /// When set, searches behave like a network/auth failure.
    unavailable: Arc<RwLock<bool>>,
    /// Recorded searches.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
}

impl std::fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockProvider")
            .field("name", &self.name)
            .field("synthetic", &self.synthetic)
            .finish()
    }
}

impl MockProvider {
    /// Create a mock that returns nothing.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            synthetic: false,
            images: Arc::new(RwLock::new(Vec::new())),
            unavailable: Arc::new(RwLock::new(false)),
            searches: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Return these images from every search.
    pub fn with_images(mut self, images: Vec<ImageResult>) -> Self {
        self.images = Arc::new(RwLock::new(images));
        self
    }

    /// Mark as a synthetic filler source.
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Start out unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = Arc::new(RwLock::new(true));
        self
    }

    /// Replace the images returned by subsequent searches.
    pub async fn set_images(&self, images: Vec<ImageResult>) {
        *self.images.write().await = images;
    }

    /// Toggle simulated failure.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    /// Get recorded searches.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Number of searches made.
    pub async fn call_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Forget recorded searches.
    pub async fn clear_searches(&self) {
        self.searches.write().await.clear();
    }
}

#[async_trait]
impl ImageProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    async fn search(&self, query: &ImageQuery) -> Option<ResultGroup> {
        self.searches.write().await.push(RecordedSearch {
            query: query.clone(),
            timestamp: Instant::now(),
        });

        if *self.unavailable.read().await {
            return None;
        }

        let images: Vec<ImageResult> = self
            .images
            .read()
            .await
            .iter()
            .cloned()
            .map(|mut image| {
                image.provider_name = self.name.clone();
                image
            })
            .collect();

        if images.is_empty() {
            return None;
        }
        Some(ResultGroup::new(self.name.clone(), query.clone(), images))
    }

    async fn status(&self) -> ProviderStatus {
        ProviderStatus {
            available: !*self.unavailable.read().await,
            rate_limit: None,
            last_used: None,
            last_error: None,
        }
    }
}
