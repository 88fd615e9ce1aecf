//! Headless audio backend that logs tones instead of playing them.

use glam::DVec3;
use tonefield_audio::{AudioBackend, AudioError, BackendState, ToneEvent};
use tracing::{debug, trace};

/// Simulated audio device with its own seconds clock.
///
/// Starts suspended, the way a browser-style audio context waits for a user
/// gesture, and resumes on the first request. An unavailable backend never
/// resumes and rejects every tone.
#[derive(Debug)]
pub struct TracingAudioBackend {
    state: BackendState,
    clock: f64,
    listener: DVec3,
    tones_played: u64,
}

impl TracingAudioBackend {
    pub fn new() -> Self {
        Self {
            state: BackendState::Suspended,
            clock: 0.0,
            listener: DVec3::ZERO,
            tones_played: 0,
        }
    }

    /// A backend with no output device.
    pub fn unavailable() -> Self {
        Self {
            state: BackendState::Unavailable,
            ..Self::new()
        }
    }

    /// Move the clock forward by `seconds`.
    pub fn advance(&mut self, seconds: f64) {
        self.clock += seconds;
    }

    pub fn tones_played(&self) -> u64 {
        self.tones_played
    }

    pub fn listener(&self) -> DVec3 {
        self.listener
    }
}

impl Default for TracingAudioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for TracingAudioBackend {
    fn state(&self) -> BackendState {
        self.state
    }

    fn resume(&mut self) -> Result<(), AudioError> {
        match self.state {
            BackendState::Running => Ok(()),
            BackendState::Suspended => {
                debug!(clock = self.clock, "audio backend resumed");
                self.state = BackendState::Running;
                Ok(())
            }
            BackendState::Unavailable => {
                Err(AudioError::ResumeFailed("no output device".to_string()))
            }
        }
    }

    fn current_time(&self) -> f64 {
        self.clock
    }

    fn play_spatialized_tone(&mut self, tone: &ToneEvent) -> Result<(), AudioError> {
        if self.state == BackendState::Unavailable {
            return Err(AudioError::Unavailable("no output device".to_string()));
        }
        let distance = tone.position.distance(self.listener);
        let (gain, end_gain) = tone_gains(tone, distance);
        debug!(
            frequency_hz = tone.frequency_hz,
            start = tone.start_time,
            duration = tone.duration,
            distance,
            gain,
            end_gain,
            "tone"
        );
        self.tones_played += 1;
        Ok(())
    }

    fn set_listener_position(&mut self, position: DVec3) {
        trace!(x = position.x, y = position.y, z = position.z, "listener moved");
        self.listener = position;
    }
}

/// Effective gain at the start and end of `tone` for a listener `distance`
/// units away.
fn tone_gains(tone: &ToneEvent, distance: f64) -> (f64, f64) {
    let attenuation = tone.spatial.gain_at_distance(distance);
    (
        tone.envelope.gain_at(0.0, tone.duration) * attenuation,
        tone.envelope.gain_at(tone.duration, tone.duration) * attenuation,
    )
}
