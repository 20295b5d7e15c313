use std::sync::Arc;
use imagebus_core::{Config, ResolutionOrchestrator, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<ResolutionOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<ResolutionOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn orchestrator(&self) -> &ResolutionOrchestrator {
        self.orchestrator.as_ref()
    }
}
