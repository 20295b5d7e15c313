//! Prometheus metrics for the resolution engine.
//!
//! The collectors are process-wide; the server registers them via
//! [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Resolution
// =============================================================================

/// Resolution calls by outcome.
pub static RESOLUTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("imagebus_resolutions_total", "Total resolve calls"),
        &["outcome"], // "strict", "relaxed", "empty"
    )
    .unwrap()
});

/// Provider calls made by the orchestrator.
pub static PROVIDER_ATTEMPTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "imagebus_provider_attempts_total",
            "Provider calls made during resolution",
        ),
        &["provider", "phase", "result"], // result: "accepted", "rejected", "empty"
    )
    .unwrap()
});

/// Candidates dropped by the quality gate.
pub static QUALITY_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "imagebus_quality_rejections_total",
            "Image candidates rejected by the quality gate",
        ),
        &["profile", "reason"],
    )
    .unwrap()
});

// =============================================================================
// Providers
// =============================================================================

/// Provider search latency in seconds.
pub static PROVIDER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "imagebus_provider_duration_seconds",
            "Duration of provider search calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["provider"],
    )
    .unwrap()
});

/// All core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(RESOLUTIONS_TOTAL.clone()),
        Box::new(PROVIDER_ATTEMPTS.clone()),
        Box::new(QUALITY_REJECTIONS.clone()),
        Box::new(PROVIDER_DURATION.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_metrics_register_once() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }

        RESOLUTIONS_TOTAL.with_label_values(&["strict"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "imagebus_resolutions_total"));
    }
}
