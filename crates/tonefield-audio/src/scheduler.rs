//! Proximity-triggered phrase scheduling.
//!
//! Once per tick the scheduler:
//! 1. reverts emitter highlights whose deadline has passed;
//! 2. moves the listener to the observer;
//! 3. fires every in-range emitter whose cooldown has elapsed.
//!
//! Firing plays a phrase, highlights the emitter's disc, and starts a new
//! cooldown. Timers live inside the scheduler as explicit deadlines, so the
//! whole loop is single-threaded and reproducible under a fixed RNG seed.

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tonefield_terrain::EmitterId;
use tracing::{debug, trace, warn};

use crate::backend::{AudioBackend, BackendState, SpatialParams};
use crate::phrase::{PhraseConfig, compose_phrase};
use crate::registry::EmitterRegistry;

/// Capability that shows which emitters are currently sounding.
pub trait VisualFeedback {
    fn set_emitter_active(&mut self, id: EmitterId, active: bool);
}

/// Headless hosts can run without any visuals.
impl VisualFeedback for () {
    fn set_emitter_active(&mut self, _id: EmitterId, _active: bool) {}
}

/// Tunables for [`ProximityAudioScheduler`]. Times are in milliseconds on the
/// scheduler clock; phrase timings are in seconds on the backend clock.
#[derive(Clone, Debug, PartialEq)]
pub struct SchedulerConfig {
    /// Emitters strictly closer than this fire.
    pub trigger_radius: f64,
    pub cooldown_min_ms: f64,
    /// Upper bound of the uniform extra cooldown.
    pub cooldown_jitter_ms: f64,
    /// How long an emitter stays highlighted after firing.
    pub highlight_ms: f64,
    pub phrase: PhraseConfig,
    pub spatial: SpatialParams,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            trigger_radius: 10.0,
            cooldown_min_ms: 4000.0,
            cooldown_jitter_ms: 3000.0,
            highlight_ms: 800.0,
            phrase: PhraseConfig::default(),
            spatial: SpatialParams::linear(10.0),
        }
    }
}

/// What happened during one [`ProximityAudioScheduler::tick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Emitters that fired, in registry order.
    pub triggered: Vec<EmitterId>,
    /// Emitters whose highlight was switched off.
    pub reverted: Vec<EmitterId>,
    pub tones_scheduled: usize,
    pub tones_failed: usize,
    /// Set when the backend was not running and `resume` failed.
    pub backend_unavailable: bool,
}

#[derive(Clone, Copy, Debug)]
struct PendingRevert {
    id: EmitterId,
    revert_at: f64,
}

/// Fires emitter phrases as the observer comes within range.
pub struct ProximityAudioScheduler<A, V> {
    config: SchedulerConfig,
    audio: A,
    visuals: V,
    rng: ChaCha8Rng,
    pending_reverts: Vec<PendingRevert>,
    total_triggers: u64,
}

impl<A: AudioBackend, V: VisualFeedback> ProximityAudioScheduler<A, V> {
    /// Create a scheduler. `rng_seed` drives note choice and cooldown jitter.
    pub fn new(config: SchedulerConfig, audio: A, visuals: V, rng_seed: u64) -> Self {
        Self {
            config,
            audio,
            visuals,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            pending_reverts: Vec::new(),
            total_triggers: 0,
        }
    }

    /// Settings this scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The audio backend phrases are sent to.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Mutable backend access, e.g. to advance its clock.
    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    /// The visual feedback sink.
    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    /// Triggers since construction.
    pub fn total_triggers(&self) -> u64 {
        self.total_triggers
    }

    /// Number of emitters currently highlighted.
    pub fn active_highlights(&self) -> usize {
        self.pending_reverts.len()
    }

    /// Advance the scheduler to time `now` (ms) with the observer at `observer`.
    pub fn tick(
        &mut self,
        registry: &mut EmitterRegistry,
        observer: DVec3,
        now: f64,
    ) -> TickReport {
        let mut report = TickReport::default();

        self.revert_expired(now, &mut report);
        self.audio.set_listener_position(observer);

        let eligible: Vec<(EmitterId, DVec3)> = registry
            .sites_within(observer, self.config.trigger_radius)
            .into_iter()
            .filter(|site| site.is_eligible(now))
            .map(|site| (site.id, site.position))
            .collect();

        if eligible.is_empty() {
            return report;
        }

        report.backend_unavailable = !self.ensure_running();

        for (id, position) in eligible {
            self.play_phrase(id, position, &mut report);
            self.highlight(id, now);

            match registry.mark_triggered(
                id,
                now,
                self.config.cooldown_min_ms,
                self.config.cooldown_jitter_ms,
                &mut self.rng,
            ) {
                Ok(next) => debug!(%id, now, next_eligible = next, "emitter triggered"),
                Err(e) => warn!("could not start cooldown: {e}"),
            }

            self.total_triggers += 1;
            report.triggered.push(id);
        }

        report
    }

    /// One resume attempt if the backend is not running. Returns whether the
    /// backend is usable afterwards.
    fn ensure_running(&mut self) -> bool {
        if self.audio.state() == BackendState::Running {
            return true;
        }
        match self.audio.resume() {
            Ok(()) => true,
            Err(e) => {
                warn!("audio backend not running, phrases may be silent: {e}");
                false
            }
        }
    }

    fn play_phrase(&mut self, id: EmitterId, position: DVec3, report: &mut TickReport) {
        let start = self.audio.current_time();
        let tones = compose_phrase(
            &self.config.phrase,
            start,
            position,
            self.config.spatial,
            &mut self.rng,
        );
        for tone in &tones {
            match self.audio.play_spatialized_tone(tone) {
                Ok(()) => report.tones_scheduled += 1,
                Err(e) => {
                    report.tones_failed += 1;
                    warn!(%id, "{e}");
                }
            }
        }
        trace!(%id, notes = tones.len(), start, "phrase scheduled");
    }

    fn highlight(&mut self, id: EmitterId, now: f64) {
        self.visuals.set_emitter_active(id, true);
        let revert_at = now + self.config.highlight_ms;
        match self.pending_reverts.iter_mut().find(|p| p.id == id) {
            Some(pending) => pending.revert_at = revert_at,
            None => self.pending_reverts.push(PendingRevert { id, revert_at }),
        }
    }

    fn revert_expired(&mut self, now: f64, report: &mut TickReport) {
        let visuals = &mut self.visuals;
        self.pending_reverts.retain(|pending| {
            if pending.revert_at <= now {
                visuals.set_emitter_active(pending.id, false);
                report.reverted.push(pending.id);
                false
            } else {
                true
            }
        });
    }
}
