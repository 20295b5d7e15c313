//! Types for the resolution orchestrator.

use serde::Serialize;
use std::fmt;

use crate::quality::QualityProfile;

/// Search phase of one resolve call.
///
/// Strict runs the routed sequence under the strict gate; Relaxed sweeps
/// every adapter under the relaxed gate. There is no way back to Strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Strict,
    Relaxed,
}

impl Phase {
    /// Phase to enter when this one accepts nothing.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Strict => Some(Phase::Relaxed),
            Phase::Relaxed => None,
        }
    }

    pub fn profile(self) -> QualityProfile {
        match self {
            Phase::Strict => QualityProfile::Strict,
            Phase::Relaxed => QualityProfile::Relaxed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Strict => "strict",
            Phase::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
