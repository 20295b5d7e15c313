//! Image quality gate.
//!
//! A [`QualityGate`] evaluates one candidate image against a named rule
//! set ([`QualityProfile::Strict`] or [`QualityProfile::Relaxed`]). Both
//! profiles run through the same ordered predicate list; only the marker
//! set and thresholds differ.

mod gate;
mod markers;

pub use gate::{QualityGate, QualityProfile, Rejection, Rule};
pub use markers::BlacklistMarker;
