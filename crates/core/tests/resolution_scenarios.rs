//! End-to-end resolution scenarios against mock providers.
//!
//! Every test registers the full provider set under their real names so the
//! default routing table applies unchanged.

use std::sync::Arc;

use imagebus_core::{
    providers::{names, PlaceholderConfig, PlaceholderProvider},
    testing::{fixtures, MockProvider},
    Category, EngineConfig, ImageProvider, ImageQuery, ResolutionOrchestrator, ResolutionTarget,
};

/// Mock for every provider, placeholder included.
struct TestHarness {
    wikimedia: Arc<MockProvider>,
    unsplash: Arc<MockProvider>,
    pexels: Arc<MockProvider>,
    pixabay: Arc<MockProvider>,
    openverse: Arc<MockProvider>,
    placeholder: Arc<MockProvider>,
}

impl TestHarness {
    fn new() -> Self {
        Self {
            wikimedia: Arc::new(MockProvider::new(names::WIKIMEDIA)),
            unsplash: Arc::new(MockProvider::new(names::UNSPLASH)),
            pexels: Arc::new(MockProvider::new(names::PEXELS)),
            pixabay: Arc::new(MockProvider::new(names::PIXABAY)),
            openverse: Arc::new(MockProvider::new(names::OPENVERSE)),
            placeholder: Arc::new(MockProvider::new(names::PLACEHOLDER).synthetic()),
        }
    }

    fn real(&self) -> [&Arc<MockProvider>; 5] {
        [
            &self.wikimedia,
            &self.unsplash,
            &self.pexels,
            &self.pixabay,
            &self.openverse,
        ]
    }

    fn registry(&self) -> Vec<Arc<dyn ImageProvider>> {
        let mut providers: Vec<Arc<dyn ImageProvider>> = self
            .real()
            .into_iter()
            .map(|p| Arc::clone(p) as Arc<dyn ImageProvider>)
            .collect();
        providers.push(self.placeholder.clone());
        providers
    }

    fn orchestrator(&self) -> ResolutionOrchestrator {
        ResolutionOrchestrator::new(self.registry(), EngineConfig::immediate())
    }

    /// Same mocks, but the real placeholder adapter instead of a mock.
    fn orchestrator_with_real_placeholder(&self) -> ResolutionOrchestrator {
        let mut providers: Vec<Arc<dyn ImageProvider>> = self
            .real()
            .into_iter()
            .map(|p| Arc::clone(p) as Arc<dyn ImageProvider>)
            .collect();
        providers.push(Arc::new(PlaceholderProvider::new(PlaceholderConfig::default())));
        ResolutionOrchestrator::new(providers, EngineConfig::immediate())
    }

    async fn set_all(&self, width: u32, height: u32) {
        for mock in self.real() {
            mock.set_images(fixtures::images(mock.name(), 3, width, height))
                .await;
        }
        self.placeholder
            .set_images(fixtures::images(names::PLACEHOLDER, 3, width, height))
            .await;
    }

    async fn calls(&self) -> Vec<(&str, usize)> {
        let mut calls = Vec::new();
        for mock in self.real().into_iter().chain([&self.placeholder]) {
            calls.push((mock.name(), mock.call_count().await));
        }
        calls
    }
}

#[tokio::test]
async fn test_scenario_a_first_general_provider_satisfies_request() {
    let harness = TestHarness::new();
    harness
        .unsplash
        .set_images(fixtures::images(names::UNSPLASH, 3, 3000, 2000))
        .await;
    let orchestrator = harness.orchestrator();

    let query = ImageQuery::new("roman forum at sunset")
        .with_category(Category::General)
        .with_count(3);
    let outcome = orchestrator.resolve(&query).await;

    assert_eq!(outcome.groups.len(), 1);
    let group = &outcome.groups[0];
    assert_eq!(group.provider_name, names::UNSPLASH);
    assert_eq!(group.images.len(), 3);
    assert_eq!(group.query, query);

    assert_eq!(harness.unsplash.call_count().await, 1);
    for (name, calls) in harness.calls().await {
        if name != names::UNSPLASH {
            assert_eq!(calls, 0, "{} should not have been queried", name);
        }
    }
}

#[tokio::test]
async fn test_scenario_b_famous_person_falls_through_to_second_tier() {
    let harness = TestHarness::new();
    harness
        .unsplash
        .set_images(fixtures::images(names::UNSPLASH, 2, 2560, 1440))
        .await;
    let orchestrator = harness.orchestrator();

    let query = ImageQuery::new("albert einstein")
        .with_category(Category::FamousPerson)
        .with_count(2);
    let outcome = orchestrator.resolve(&query).await;

    let group = outcome.first_group().expect("expected a result group");
    assert_eq!(group.provider_name, names::UNSPLASH);
    assert_eq!(group.images.len(), 2);

    // Attempt 1 went to the archive, attempt 2 succeeded.
    assert_eq!(harness.wikimedia.call_count().await, 1);
    assert_eq!(harness.unsplash.call_count().await, 1);
    assert_eq!(harness.pexels.call_count().await, 0);
    assert_eq!(harness.placeholder.call_count().await, 0);
}

#[tokio::test]
async fn test_scenario_c_everything_too_small_is_empty() {
    let harness = TestHarness::new();
    harness.set_all(800, 600).await;
    let orchestrator = harness.orchestrator();

    let outcome = orchestrator
        .resolve(&ImageQuery::new("medieval castle").with_count(2))
        .await;

    assert!(outcome.is_empty());
    assert!(outcome.groups.is_empty());

    // Six strict attempts plus one relaxed sweep over all six adapters.
    for (name, calls) in harness.calls().await {
        assert_eq!(calls, 2, "{} call count", name);
    }
}

#[tokio::test]
async fn test_scenario_d_placeholder_fills_in_at_envelope_size() {
    let harness = TestHarness::new();
    let orchestrator = harness.orchestrator_with_real_placeholder();

    let query = ImageQuery::new("quantum entanglement")
        .with_resolution(ResolutionTarget::Uhd4k)
        .with_count(2);
    let outcome = orchestrator.resolve(&query).await;

    let group = outcome.first_group().expect("placeholder should fill in");
    assert_eq!(group.provider_name, names::PLACEHOLDER);
    assert_eq!(group.images.len(), 2);
    for image in &group.images {
        assert_eq!(image.width, Some(5120));
        assert_eq!(image.height, Some(2880));
        assert_eq!(
            image.attribution.as_deref(),
            Some("Lorem Picsum placeholder")
        );
    }
    for mock in harness.real() {
        assert_eq!(mock.call_count().await, 1, "{} call count", mock.name());
    }
}

#[tokio::test]
async fn test_scenario_d_undersized_placeholder_still_empty() {
    let harness = TestHarness::new();
    harness
        .placeholder
        .set_images(fixtures::images(names::PLACEHOLDER, 1, 1280, 720))
        .await;
    let orchestrator = harness.orchestrator();

    let outcome = orchestrator.resolve(&ImageQuery::new("quantum entanglement")).await;

    assert!(outcome.is_empty());
    // Reached last in both phases.
    assert_eq!(harness.placeholder.call_count().await, 2);
}

#[tokio::test]
async fn test_unavailable_providers_are_skipped() {
    let harness = TestHarness::new();
    harness.unsplash.set_unavailable(true).await;
    harness
        .unsplash
        .set_images(fixtures::images(names::UNSPLASH, 1, 4000, 3000))
        .await;
    harness
        .pexels
        .set_images(fixtures::images(names::PEXELS, 1, 4000, 3000))
        .await;
    let orchestrator = harness.orchestrator();

    let outcome = orchestrator.resolve(&ImageQuery::new("tokyo skyline")).await;

    assert_eq!(outcome.first_group().unwrap().provider_name, names::PEXELS);
    assert_eq!(harness.unsplash.call_count().await, 1);
}

#[tokio::test]
async fn test_thumb_marker_only_passes_relaxed_pass() {
    let harness = TestHarness::new();
    let mut thumb = fixtures::dimensionless(
        names::UNSPLASH,
        "https://cdn.example.com/thumb/roman-forum.jpg",
    );
    thumb.width = Some(1920);
    thumb.height = Some(1080);
    harness.unsplash.set_images(vec![thumb]).await;
    let orchestrator = harness.orchestrator();

    let outcome = orchestrator.resolve(&ImageQuery::new("roman forum")).await;

    let group = outcome.first_group().unwrap();
    assert_eq!(group.provider_name, names::UNSPLASH);
    assert!(group.images[0].url.contains("/thumb/"));
    // Rejected in the strict pass, accepted first thing in the relaxed pass.
    assert_eq!(harness.unsplash.call_count().await, 2);
    assert_eq!(harness.placeholder.call_count().await, 1);
}

#[tokio::test]
async fn test_dimensionless_image_needs_quality_indicator_in_strict_pass() {
    let harness = TestHarness::new();
    harness
        .pexels
        .set_images(vec![fixtures::dimensionless(
            names::PEXELS,
            "https://cdn.example.com/photos/forum.jpg",
        )])
        .await;
    harness
        .pixabay
        .set_images(vec![fixtures::dimensionless(
            names::PIXABAY,
            "https://cdn.example.com/original/forum.jpg",
        )])
        .await;
    let orchestrator = harness.orchestrator();

    let outcome = orchestrator.resolve(&ImageQuery::new("forum")).await;

    assert_eq!(outcome.first_group().unwrap().provider_name, names::PIXABAY);
    assert_eq!(harness.pexels.call_count().await, 1);
}

#[tokio::test]
async fn test_repeated_resolves_are_deterministic() {
    let harness = TestHarness::new();
    let mut images = fixtures::images(names::PIXABAY, 2, 1200, 800);
    images.extend(fixtures::images(names::PIXABAY, 2, 3840, 2160));
    harness.pixabay.set_images(images).await;
    harness
        .openverse
        .set_images(fixtures::images(names::OPENVERSE, 4, 5000, 3000))
        .await;
    let orchestrator = harness.orchestrator();

    let query = ImageQuery::new("great wall of china")
        .with_category(Category::StockImage)
        .with_count(4);
    let first = orchestrator.resolve(&query).await;
    let first_calls = harness.unsplash.call_count().await;
    harness.unsplash.clear_searches().await;
    assert_eq!(harness.unsplash.call_count().await, 0);

    let second = orchestrator.resolve(&query).await;

    assert_eq!(first, second);
    assert_eq!(harness.unsplash.call_count().await, first_calls);
    let group = first.first_group().unwrap();
    assert_eq!(group.provider_name, names::PIXABAY);
    assert!(group.images.iter().all(|i| i.width == Some(3840)));
}

#[tokio::test]
async fn test_concurrent_resolves_are_independent() {
    let harness = TestHarness::new();
    harness
        .wikimedia
        .set_images(fixtures::images(names::WIKIMEDIA, 1, 3000, 3000))
        .await;
    harness
        .unsplash
        .set_images(fixtures::images(names::UNSPLASH, 1, 3000, 2000))
        .await;
    let orchestrator = Arc::new(harness.orchestrator());

    let person = ImageQuery::new("marie curie").with_category(Category::FamousPerson);
    let general = ImageQuery::new("laboratory glassware");

    let (a, b) = tokio::join!(orchestrator.resolve(&person), orchestrator.resolve(&general));

    assert_eq!(a.first_group().unwrap().provider_name, names::WIKIMEDIA);
    assert_eq!(b.first_group().unwrap().provider_name, names::UNSPLASH);
}

#[tokio::test]
async fn test_resolve_single_uses_first_image() {
    let harness = TestHarness::new();
    harness
        .unsplash
        .set_images(fixtures::images(names::UNSPLASH, 3, 3000, 2000))
        .await;
    let orchestrator = harness.orchestrator();

    let group = orchestrator
        .resolve_single(&ImageQuery::new("colosseum").with_count(3))
        .await
        .unwrap();

    assert_eq!(group.images.len(), 1);
    assert_eq!(
        group.images[0].url,
        "https://cdn.example.com/unsplash/0/photo.jpg"
    );
}
