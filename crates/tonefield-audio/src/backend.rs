//! The audio backend port and the tone events it receives.
//!
//! The scheduler never synthesizes audio itself. It hands fully described,
//! absolutely timed [`ToneEvent`]s to an [`AudioBackend`], which owns the
//! oscillators, gain ramps and 3D panners.

use glam::DVec3;

use crate::error::AudioError;

/// Run state of the backend's audio clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendState {
    /// Clock advancing, tones will be heard.
    Running,
    /// Clock paused (e.g. waiting for a user gesture). `resume` may fix it.
    Suspended,
    /// No output device. `resume` is still attempted.
    Unavailable,
}

/// Head-related or equal-power panning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanningModel {
    Hrtf,
    EqualPower,
}

/// Distance attenuation curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceModel {
    Linear,
    Inverse,
    Exponential,
}

/// 3D panner settings attached to every tone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialParams {
    pub panning: PanningModel,
    pub distance_model: DistanceModel,
    pub ref_distance: f64,
    pub max_distance: f64,
    pub rolloff: f64,
}

impl SpatialParams {
    /// Linear HRTF panner that falls silent at `max_distance`.
    pub fn linear(max_distance: f64) -> Self {
        Self {
            panning: PanningModel::Hrtf,
            distance_model: DistanceModel::Linear,
            ref_distance: 1.0,
            max_distance,
            rolloff: 1.0,
        }
    }

    /// Distance gain in `[0, 1]` for a listener `distance` units away.
    pub fn gain_at_distance(&self, distance: f64) -> f64 {
        let d = distance.max(self.ref_distance);
        match self.distance_model {
            DistanceModel::Linear => {
                let span = self.max_distance - self.ref_distance;
                if span <= 0.0 {
                    return 1.0;
                }
                let d = d.min(self.max_distance);
                (1.0 - self.rolloff * (d - self.ref_distance) / span).clamp(0.0, 1.0)
            }
            DistanceModel::Inverse => {
                self.ref_distance
                    / (self.ref_distance + self.rolloff * (d - self.ref_distance))
            }
            DistanceModel::Exponential => (d / self.ref_distance).powf(-self.rolloff),
        }
    }
}

/// Exponential decay from `peak` to `floor` across a note.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub peak: f64,
    pub floor: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            peak: 0.2,
            floor: 0.01,
        }
    }
}

impl Envelope {
    /// Gain `elapsed` seconds into a note of length `duration`.
    pub fn gain_at(&self, elapsed: f64, duration: f64) -> f64 {
        if duration <= 0.0 || elapsed >= duration {
            return self.floor;
        }
        let t = (elapsed / duration).max(0.0);
        self.peak * (self.floor / self.peak).powf(t)
    }
}

/// One sine tone, scheduled on the backend's clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ToneEvent {
    pub frequency_hz: f64,
    /// Backend clock time (seconds) at which the tone starts.
    pub start_time: f64,
    /// Length in seconds.
    pub duration: f64,
    /// Where the tone is anchored in the world.
    pub position: DVec3,
    pub envelope: Envelope,
    pub spatial: SpatialParams,
}

/// Capability the scheduler uses to make sound.
pub trait AudioBackend {
    fn state(&self) -> BackendState;

    /// Try to get the clock running again.
    fn resume(&mut self) -> Result<(), AudioError>;

    /// Backend clock in seconds.
    fn current_time(&self) -> f64;

    fn play_spatialized_tone(&mut self, tone: &ToneEvent) -> Result<(), AudioError>;

    /// Move the listener (the observer's ears).
    fn set_listener_position(&mut self, position: DVec3);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_gain_falls_to_zero_at_max_distance() {
        let spatial = SpatialParams::linear(10.0);
        assert_eq!(spatial.gain_at_distance(0.0), 1.0);
        assert_eq!(spatial.gain_at_distance(1.0), 1.0);
        assert!((spatial.gain_at_distance(5.5) - 0.5).abs() < 1e-12);
        assert_eq!(spatial.gain_at_distance(10.0), 0.0);
        assert_eq!(spatial.gain_at_distance(50.0), 0.0);
    }

    #[test]
    fn test_inverse_and_exponential_decrease_with_distance() {
        for model in [DistanceModel::Inverse, DistanceModel::Exponential] {
            let spatial = SpatialParams {
                distance_model: model,
                ..SpatialParams::linear(10.0)
            };
            assert!(spatial.gain_at_distance(2.0) > spatial.gain_at_distance(4.0));
            assert!((spatial.gain_at_distance(1.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_envelope_decays_from_peak_to_floor() {
        let env = Envelope::default();
        assert!((env.gain_at(0.0, 0.25) - 0.2).abs() < 1e-12);
        assert!((env.gain_at(0.25, 0.25) - 0.01).abs() < 1e-12);
        let mid = env.gain_at(0.125, 0.25);
        // Geometric mean of peak and floor.
        assert!((mid - (0.2f64 * 0.01).sqrt()).abs() < 1e-12);
    }
}
