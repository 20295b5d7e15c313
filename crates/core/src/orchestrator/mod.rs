//! Two-phase image resolution.
//!
//! A resolve call first walks the routed provider sequence under the strict
//! quality gate and stops at the first provider with an acceptable image.
//! If that finds nothing, every adapter is tried once under the relaxed gate.
//! An empty outcome is a normal result, not an error.

mod config;
mod runner;
mod types;

pub use config::EngineConfig;
pub use runner::ResolutionOrchestrator;
pub use types::Phase;
