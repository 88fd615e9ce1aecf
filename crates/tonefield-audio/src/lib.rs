//! Spatial audio emitters: the emitter registry with cooldowns, melodic
//! phrase generation, and the proximity scheduler that drives an injected
//! audio backend and visual-feedback hook.

mod backend;
mod error;
mod phrase;
mod registry;
mod scheduler;

pub use backend::{
    AudioBackend, BackendState, DistanceModel, Envelope, PanningModel, SpatialParams, ToneEvent,
};
pub use error::{AudioError, RegistryError};
pub use phrase::{C_MAJOR, PhraseConfig, compose_phrase};
pub use registry::EmitterRegistry;
pub use scheduler::{ProximityAudioScheduler, SchedulerConfig, TickReport, VisualFeedback};
