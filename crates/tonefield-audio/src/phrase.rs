//! Short randomized melodic phrases.

use glam::DVec3;
use rand::Rng;

use crate::backend::{Envelope, SpatialParams, ToneEvent};

/// C major, C4 to C5.
pub const C_MAJOR: [f64; 7] = [261.63, 293.66, 329.63, 392.00, 440.00, 493.88, 523.25];

/// Shape of every phrase an emitter plays.
#[derive(Clone, Debug, PartialEq)]
pub struct PhraseConfig {
    pub notes_per_phrase: usize,
    /// Note length in seconds.
    pub note_duration: f64,
    /// Start-to-start gap between notes in seconds.
    pub note_spacing: f64,
    /// Candidate frequencies; each note picks one uniformly.
    pub scale: Vec<f64>,
    pub envelope: Envelope,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            notes_per_phrase: 5,
            note_duration: 0.25,
            note_spacing: 0.3,
            scale: C_MAJOR.to_vec(),
            envelope: Envelope::default(),
        }
    }
}

/// Build one phrase starting at backend time `start_time`.
///
/// Notes are drawn independently, so repeats are allowed. An empty scale
/// yields an empty phrase.
pub fn compose_phrase<R: Rng + ?Sized>(
    config: &PhraseConfig,
    start_time: f64,
    position: DVec3,
    spatial: SpatialParams,
    rng: &mut R,
) -> Vec<ToneEvent> {
    if config.scale.is_empty() {
        return Vec::new();
    }
    (0..config.notes_per_phrase)
        .map(|i| ToneEvent {
            frequency_hz: config.scale[rng.random_range(0..config.scale.len())],
            start_time: start_time + i as f64 * config.note_spacing,
            duration: config.note_duration,
            position,
            envelope: config.envelope,
            spatial,
        })
        .collect()
}
