//! Audio subsystem error types.

use tonefield_terrain::EmitterId;

/// Failures reported by an [`AudioBackend`](crate::AudioBackend).
///
/// None of these are fatal to the simulation; the scheduler logs them and
/// keeps going.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum AudioError {
    /// The output device is missing or has been closed.
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
    /// The backend refused to leave the suspended state.
    #[error("failed to resume audio backend: {0}")]
    ResumeFailed(String),
    /// A single tone could not be scheduled.
    #[error("failed to schedule tone: {0}")]
    ToneRejected(String),
}

/// Errors from [`EmitterRegistry`](crate::EmitterRegistry) operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown emitter {0}")]
    UnknownEmitter(EmitterId),
    #[error("emitter {0} registered twice")]
    DuplicateEmitter(EmitterId),
}
