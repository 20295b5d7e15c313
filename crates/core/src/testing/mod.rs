//! Testing utilities: a mock provider and a canned HTTP server.
//!
//! # Example
//!
//! ```rust,ignore
//! use imagebus_core::testing::{fixtures, MockProvider};
//!
//! let wikimedia = Arc::new(MockProvider::new("wikimedia"));
//! let unsplash = Arc::new(
//!     MockProvider::new("unsplash").with_images(fixtures::images("unsplash", 2, 2560, 1440)),
//! );
//!
//! let orchestrator = ResolutionOrchestrator::new(
//!     vec![wikimedia.clone(), unsplash.clone()],
//!     EngineConfig::immediate(),
//! );
//! ```

mod canned_http;
mod mock_provider;

pub use canned_http::{CannedResponse, CannedServer};
pub use mock_provider::{MockProvider, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::imagery::ImageResult;

    /// One image with known dimensions.
    pub fn image(provider: &str, index: usize, width: u32, height: u32) -> ImageResult {
        ImageResult::new(
            provider,
            format!("https://cdn.example.com/{}/{}/photo.jpg", provider, index),
        )
        .with_dimensions(width, height)
    }

    /// `count` images with the same dimensions.
    pub fn images(provider: &str, count: usize, width: u32, height: u32) -> Vec<ImageResult> {
        (0..count)
            .map(|i| image(provider, i, width, height))
            .collect()
    }

    /// An image whose provider did not report dimensions.
    pub fn dimensionless(provider: &str, url: &str) -> ImageResult {
        ImageResult::new(provider, url)
    }
}
