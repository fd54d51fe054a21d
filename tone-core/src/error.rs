//! Error types for the note-strength engine.
//!
//! Numeric edge cases (silence, out-of-range frequencies, an empty octave
//! selection) are not errors and never show up here. These variants cover
//! user selections that have to be rejected before they reach the engine.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A display range whose upper bound does not exceed its lower bound.
    #[error("invalid display range: maxDb ({max_db}) must be greater than minDb ({min_db})")]
    InvalidDisplayRange { min_db: f32, max_db: f32 },

    /// A preset index past the last display range preset.
    #[error("no display range preset with index {0}")]
    UnknownPreset(usize),

    /// A tuning system identifier outside the known set.
    #[error("unknown tuning system '{0}'")]
    UnknownTuningSystem(String),

    /// A column label that is neither "OALL" nor "O0".."O9".
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The analysis worker thread is gone.
    #[error("analysis worker is no longer running")]
    WorkerClosed,
}
