//! Image provider adapters.
//!
//! Every adapter implements [`ImageProvider`] and hides its own transport,
//! auth and response format behind `search`. Failures never leave an adapter:
//! they are logged, remembered for `status()`, and reported as `None`.

mod http;
mod openverse;
mod pexels;
mod pixabay;
mod placeholder;
mod rate_limiter;
mod tracker;
mod traits;
mod unsplash;
mod wikimedia;

use std::sync::Arc;

use tracing::info;

use crate::config::ProvidersConfig;

pub use openverse::{OpenverseConfig, OpenverseProvider};
pub use pexels::{PexelsConfig, PexelsProvider};
pub use pixabay::{PixabayConfig, PixabayProvider};
pub use placeholder::{PlaceholderConfig, PlaceholderProvider};
pub use rate_limiter::{BucketStatus, TokenBucket};
pub use tracker::ProviderTracker;
pub use traits::*;
pub use unsplash::{UnsplashConfig, UnsplashProvider};
pub use wikimedia::{WikimediaConfig, WikimediaProvider};

/// Registered adapter names, as used by the routing table.
pub mod names {
    pub const WIKIMEDIA: &str = "wikimedia";
    pub const UNSPLASH: &str = "unsplash";
    pub const PEXELS: &str = "pexels";
    pub const PIXABAY: &str = "pixabay";
    pub const OPENVERSE: &str = "openverse";
    pub const PLACEHOLDER: &str = "placeholder";
}

/// Adapters ask for this many candidates per wanted image, since most of a
/// page usually fails the quality gate.
pub const OVERSAMPLE: u32 = 3;

/// Build every adapter the configuration enables.
///
/// Order is the fallback pass order: real providers first, synthetic last.
pub fn build_providers(
    config: &ProvidersConfig,
) -> Result<Vec<Arc<dyn ImageProvider>>, ProviderError> {
    let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::new();

    if let Some(unsplash) = &config.unsplash {
        providers.push(Arc::new(UnsplashProvider::new(unsplash.clone())?));
    }
    if let Some(pexels) = &config.pexels {
        providers.push(Arc::new(PexelsProvider::new(pexels.clone())?));
    }
    if let Some(pixabay) = &config.pixabay {
        providers.push(Arc::new(PixabayProvider::new(pixabay.clone())?));
    }
    if config.openverse.enabled {
        providers.push(Arc::new(OpenverseProvider::new(config.openverse.clone())?));
    }
    if config.wikimedia.enabled {
        providers.push(Arc::new(WikimediaProvider::new(config.wikimedia.clone())?));
    }
    if config.placeholder.enabled {
        providers.push(Arc::new(PlaceholderProvider::new(
            config.placeholder.clone(),
        )));
    }

    for provider in &providers {
        info!(provider = provider.name(), synthetic = provider.is_synthetic(), "Registered image provider");
    }

    Ok(providers)
}
