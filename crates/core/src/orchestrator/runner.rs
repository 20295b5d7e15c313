//! Resolution orchestrator implementation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::imagery::{ImageQuery, ResolutionOutcome, ResultGroup};
use crate::metrics;
use crate::providers::{ImageProvider, ProviderStatus};
use crate::quality::{QualityGate, QualityProfile};
use crate::router::{ProviderRouter, RoutingTable};

use super::config::EngineConfig;
use super::types::Phase;

/// Drives adapters, router and quality gates for each resolve call.
///
/// Holds only static configuration; every call keeps its own attempt
/// bookkeeping, so concurrent calls never interfere.
pub struct ResolutionOrchestrator {
    /// Registered adapters in relaxed-pass order (synthetic last).
    providers: Vec<Arc<dyn ImageProvider>>,
    router: ProviderRouter,
    strict: QualityGate,
    relaxed: QualityGate,
    throttle: Duration,
}

/// Per-call state.
struct CallState {
    calls: usize,
}

impl ResolutionOrchestrator {
    pub fn new(mut providers: Vec<Arc<dyn ImageProvider>>, config: EngineConfig) -> Self {
        // Stable: real providers keep their relative order.
        providers.sort_by_key(|p| p.is_synthetic());

        Self {
            providers,
            router: ProviderRouter::new(RoutingTable::default(), config.max_attempts),
            strict: QualityGate::strict(),
            relaxed: QualityGate::relaxed(),
            throttle: Duration::from_millis(config.throttle_ms),
        }
    }

    /// Use a custom router instead of the default routing table.
    pub fn with_router(mut self, router: ProviderRouter) -> Self {
        self.router = router;
        self
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn provider(&self, name: &str) -> Option<&Arc<dyn ImageProvider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    fn gate(&self, phase: Phase) -> &QualityGate {
        match phase.profile() {
            QualityProfile::Strict => &self.strict,
            QualityProfile::Relaxed => &self.relaxed,
        }
    }

    /// Resolve a query to at most one group of accepted images.
    pub async fn resolve(&self, query: &ImageQuery) -> ResolutionOutcome {
        let mut call = CallState { calls: 0 };
        let mut phase = Some(Phase::Strict);

        while let Some(current) = phase {
            let found = match current {
                Phase::Strict => self.strict_pass(query, &mut call).await,
                Phase::Relaxed => self.relaxed_pass(query, &mut call).await,
            };

            if let Some(group) = found {
                info!(
                    query = %query.text,
                    provider = %group.provider_name,
                    phase = %current,
                    accepted = group.images.len(),
                    "Resolved images"
                );
                metrics::RESOLUTIONS_TOTAL
                    .with_label_values(&[current.as_str()])
                    .inc();
                return ResolutionOutcome::single(group);
            }

            phase = current.next();
            if let Some(next) = phase {
                info!(query = %query.text, from = %current, to = %next, "No acceptable images, relaxing quality");
            }
        }

        warn!(query = %query.text, calls = call.calls, "No imagery available for query");
        metrics::RESOLUTIONS_TOTAL.with_label_values(&["empty"]).inc();
        ResolutionOutcome::empty()
    }

    /// Resolve one image: the first image of the first group, if any.
    pub async fn resolve_single(&self, query: &ImageQuery) -> Option<ResultGroup> {
        let single = query.clone().with_count(1);
        let mut group = self.resolve(&single).await.into_first_group()?;
        group.images.truncate(1);
        Some(group)
    }

    /// Per-adapter availability from self-reported state. No network calls.
    pub async fn status(&self) -> BTreeMap<String, ProviderStatus> {
        let mut statuses = BTreeMap::new();
        for provider in &self.providers {
            statuses.insert(provider.name().to_string(), provider.status().await);
        }
        statuses
    }

    async fn strict_pass(&self, query: &ImageQuery, call: &mut CallState) -> Option<ResultGroup> {
        let plan = self
            .router
            .plan(query.category, |name| self.provider(name).is_some());
        debug!(
            query = %query.text,
            category = query.category.as_str(),
            sequence = ?plan.sequence,
            max_attempts = plan.max_attempts,
            "Planned strict pass"
        );

        for (attempt, name) in plan.attempts() {
            let Some(provider) = self.provider(name) else {
                continue;
            };
            debug!(provider = name, attempt, "Strict attempt");
            if let Some(group) = self.attempt(provider.as_ref(), query, Phase::Strict, call).await {
                return Some(group);
            }
        }
        None
    }

    async fn relaxed_pass(&self, query: &ImageQuery, call: &mut CallState) -> Option<ResultGroup> {
        for (index, provider) in self.providers.iter().enumerate() {
            debug!(provider = provider.name(), attempt = index + 1, "Relaxed attempt");
            if let Some(group) = self.attempt(provider.as_ref(), query, Phase::Relaxed, call).await {
                return Some(group);
            }
        }
        None
    }

    /// One provider call: throttle, search, gate, truncate.
    async fn attempt(
        &self,
        provider: &dyn ImageProvider,
        query: &ImageQuery,
        phase: Phase,
        call: &mut CallState,
    ) -> Option<ResultGroup> {
        if call.calls > 0 && !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }
        call.calls += 1;

        let name = provider.name();
        let timer = metrics::PROVIDER_DURATION
            .with_label_values(&[name])
            .start_timer();
        let result = provider.search(query).await;
        timer.observe_duration();

        let Some(group) = result.filter(|g| !g.is_empty()) else {
            debug!(provider = name, phase = %phase, "No images from provider");
            metrics::PROVIDER_ATTEMPTS
                .with_label_values(&[name, phase.as_str(), "empty"])
                .inc();
            return None;
        };

        let gate = self.gate(phase);
        let (mut accepted, rejections) = gate.partition(group.images);
        for rejection in &rejections {
            metrics::QUALITY_REJECTIONS
                .with_label_values(&[gate.profile().as_str(), rejection.reason()])
                .inc();
        }

        debug!(
            provider = name,
            phase = %phase,
            accepted = accepted.len(),
            rejected = rejections.len(),
            "Quality gate applied"
        );

        if accepted.is_empty() {
            metrics::PROVIDER_ATTEMPTS
                .with_label_values(&[name, phase.as_str(), "rejected"])
                .inc();
            return None;
        }

        metrics::PROVIDER_ATTEMPTS
            .with_label_values(&[name, phase.as_str(), "accepted"])
            .inc();
        accepted.truncate(query.effective_count() as usize);
        Some(ResultGroup::new(name, query.clone(), accepted))
    }
}
