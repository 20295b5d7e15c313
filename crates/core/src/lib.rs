pub mod config;
pub mod imagery;
pub mod metrics;
pub mod orchestrator;
pub mod providers;
pub mod quality;
pub mod router;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ProvidersConfig,
    SanitizedConfig, ServerConfig,
};
pub use imagery::{
    Category, Dimensions, ImageQuery, ImageResult, ResolutionOutcome, ResolutionTarget,
    ResultGroup, MAX_IMAGE_COUNT,
};
pub use orchestrator::{EngineConfig, Phase, ResolutionOrchestrator};
pub use providers::{
    build_providers, ImageProvider, ProviderError, ProviderStatus, RateLimitInfo,
};
pub use quality::{QualityGate, QualityProfile, Rejection};
pub use router::{ProviderRouter, RoutePlan, RoutingTable};
