//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::router::MAX_ATTEMPTS_CAP;

/// Tuning for the resolution orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay before every provider call after the first in one resolve call
    /// (milliseconds).
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    /// Strict-phase attempt cap (1-6).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_throttle_ms() -> u64 {
    250
}

fn default_max_attempts() -> usize {
    MAX_ATTEMPTS_CAP
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            throttle_ms: default_throttle_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl EngineConfig {
    /// No throttle; for tests and local tooling.
    pub fn immediate() -> Self {
        Self {
            throttle_ms: 0,
            ..Self::default()
        }
    }
}
