//! HTTP service hosting one [`ResolutionOrchestrator`](imagebus_core::ResolutionOrchestrator).

pub mod api;
pub mod metrics;
pub mod state;

pub use api::create_router;
pub use state::AppState;
