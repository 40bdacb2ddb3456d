//! Error types for a sweep run.

use pagesweep_state::StateError;
use thiserror::Error;

use crate::orchestrator::SweepPhase;

pub type SweepResult<T> = Result<T, SweepError>;

/// Fatal run errors. Remote failures are never fatal; they end up in the
/// [`crate::RunReport`] instead.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("snapshot failure during {phase}: {source}")]
    Storage {
        phase: SweepPhase,
        #[source]
        source: StateError,
    },
}

impl SweepError {
    pub(crate) fn storage(phase: SweepPhase) -> impl FnOnce(StateError) -> SweepError {
        move |source| SweepError::Storage { phase, source }
    }
}
