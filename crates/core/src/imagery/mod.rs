//! Image query and result model.
//!
//! An [`ImageQuery`] is built once per narrative segment by the upstream
//! transcript analysis and is never mutated. Results flow back as
//! [`ResultGroup`]s wrapped in a [`ResolutionOutcome`].

mod types;

pub use types::*;
