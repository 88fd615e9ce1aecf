//! Fixed-step headless simulation: scripted input drives the observer, the
//! observer drives the audio scheduler.

use std::collections::BTreeSet;

use glam::{DVec2, DVec3};
use tonefield_audio::{
    EmitterRegistry, Envelope, PhraseConfig, ProximityAudioScheduler, SchedulerConfig,
    SpatialParams, TickReport,
};
use tonefield_config::{AudioConfig, Config, WorldConfig};
use tonefield_input::{KeyboardState, MouseState, MoveAction, MoveBindings};
use tonefield_player::{ObserverController, ObserverInput, WorldBounds};
use tonefield_terrain::{EmitterId, GeneratedTerrain, TerrainParams};
use tracing::{debug, info, warn};
use winit::keyboard::PhysicalKey;

use crate::backend::TracingAudioBackend;
use crate::error::DemoError;
use crate::scene::Scene;
use crate::walk::{LAWNMOWER, ScriptedWalk};

pub const TICK_MS: f64 = 16.0;

pub fn terrain_params(world: &WorldConfig) -> TerrainParams {
    TerrainParams {
        width: world.width,
        depth: world.depth,
        height_scale: world.height_scale,
        noise_scale: world.noise_scale,
        emitter_spacing: world.emitter_spacing,
    }
}

pub fn scheduler_config(audio: &AudioConfig) -> SchedulerConfig {
    SchedulerConfig {
        trigger_radius: audio.trigger_radius,
        cooldown_min_ms: audio.cooldown_min_ms,
        cooldown_jitter_ms: audio.cooldown_jitter_ms,
        highlight_ms: audio.highlight_ms,
        phrase: PhraseConfig {
            notes_per_phrase: audio.notes_per_phrase,
            note_duration: audio.note_duration_s,
            note_spacing: audio.note_spacing_s,
            scale: audio.scale.clone(),
            envelope: Envelope {
                peak: audio.peak_gain,
                floor: audio.floor_gain,
            },
        },
        spatial: SpatialParams::linear(audio.trigger_radius),
    }
}

/// Totals over a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WalkSummary {
    pub ticks: u64,
    pub triggers: u64,
    pub tones_scheduled: u64,
    pub tones_failed: u64,
    /// Ticks on which the backend could not be resumed.
    pub unavailable_ticks: u64,
    /// Emitters that fired at least once.
    pub distinct_emitters: BTreeSet<EmitterId>,
    pub final_position: DVec3,
}

pub struct Simulation {
    keyboard: KeyboardState,
    mouse: MouseState,
    bindings: MoveBindings,
    controller: ObserverController,
    registry: EmitterRegistry,
    scheduler: ProximityAudioScheduler<TracingAudioBackend, Scene>,
    walk: ScriptedWalk,
    now_ms: f64,
    summary: WalkSummary,
}

impl Simulation {
    pub fn new(
        config: &Config,
        terrain: GeneratedTerrain,
        scene: Scene,
        backend: TracingAudioBackend,
        rng_seed: u64,
    ) -> Result<Self, DemoError> {
        let keys = &config.observer.keys;
        let bindings =
            MoveBindings::from_names(&keys.forward, &keys.back, &keys.left, &keys.right)?;

        let bounds = WorldBounds {
            width: f64::from(terrain.grid.width()),
            depth: f64::from(terrain.grid.depth()),
        };
        let controller = ObserverController::new(
            DVec3::from_array(config.start_position()),
            bounds,
            config.observer.speed,
            config.observer.look_sensitivity,
        );

        let registry = EmitterRegistry::from_sites(terrain.emitters)?;
        let scheduler = ProximityAudioScheduler::new(
            scheduler_config(&config.audio),
            backend,
            scene,
            rng_seed,
        );

        let mut mouse = MouseState::new();
        mouse.set_captured(true);

        Ok(Self {
            keyboard: KeyboardState::new(),
            mouse,
            bindings,
            controller,
            registry,
            scheduler,
            walk: ScriptedWalk::new(LAWNMOWER),
            now_ms: 0.0,
            summary: WalkSummary::default(),
        })
    }

    pub fn observer(&self) -> &ObserverController {
        &self.controller
    }

    pub fn registry(&self) -> &EmitterRegistry {
        &self.registry
    }

    pub fn scene(&self) -> &Scene {
        self.scheduler.visuals()
    }

    pub fn backend(&self) -> &TracingAudioBackend {
        self.scheduler.audio()
    }

    /// Advance one tick.
    pub fn step(&mut self) -> TickReport {
        self.feed_script();

        let input = ObserverInput::from_devices(&self.keyboard, &mut self.mouse, &self.bindings);
        let position = self.controller.tick(&input).position;
        self.keyboard.clear_transients();

        let report = self
            .scheduler
            .tick(&mut self.registry, position, self.now_ms);
        for id in &report.triggered {
            if let Some(disc) = self.scene().disc(*id) {
                debug!(
                    %id,
                    now_ms = self.now_ms,
                    x = disc.center.x,
                    z = disc.center.z,
                    "emitter fired"
                );
            }
        }
        self.record(&report, position);

        self.now_ms += TICK_MS;
        self.scheduler.audio_mut().advance(TICK_MS / 1000.0);
        report
    }

    /// Run `ticks` ticks and return the totals.
    pub fn run(&mut self, ticks: u32) -> &WalkSummary {
        for _ in 0..ticks {
            self.step();
        }
        let s = &self.summary;
        if s.unavailable_ticks > 0 {
            warn!(
                ticks = s.unavailable_ticks,
                "audio backend was unavailable during the walk"
            );
        }
        info!(
            ticks = s.ticks,
            triggers = s.triggers,
            distinct = s.distinct_emitters.len(),
            tones = s.tones_scheduled,
            "walk finished"
        );
        &self.summary
    }

    fn feed_script(&mut self) {
        let Some(segment) = self.walk.next_step() else {
            self.keyboard.release_all();
            return;
        };
        for action in MoveAction::ALL {
            let key = PhysicalKey::Code(self.bindings.key_for(action));
            self.keyboard.set_held(key, segment.hold.contains(&action));
        }
        if segment.look_per_tick != DVec2::ZERO {
            self.mouse
                .on_raw_motion(segment.look_per_tick.x, segment.look_per_tick.y);
        }
    }

    fn record(&mut self, report: &TickReport, position: DVec3) {
        let s = &mut self.summary;
        s.ticks += 1;
        s.triggers += report.triggered.len() as u64;
        s.tones_scheduled += report.tones_scheduled as u64;
        s.tones_failed += report.tones_failed as u64;
        if report.backend_unavailable {
            s.unavailable_ticks += 1;
        }
        s.distinct_emitters.extend(report.triggered.iter().copied());
        s.final_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuilder;
    use std::collections::HashMap;
    use tonefield_terrain::{NoiseField, TerrainSynthesizer};

    fn small_config() -> Config {
        let mut config = Config::default();
        config.world.width = 21;
        config.world.depth = 21;
        config.world.seed = Some(0.5);
        // Low enough that the walk passes right over emitters.
        config.observer.start_position = Some([0.0, 5.0, 21.0]);
        config.audio.trigger_radius = 12.0;
        config
    }

    fn simulation(config: &Config, backend: TracingAudioBackend) -> Simulation {
        let terrain = TerrainSynthesizer::new(NoiseField::new(0.5))
            .generate(&terrain_params(&config.world))
            .unwrap();
        let scene = SceneBuilder::new(config.world.block_size).build(&terrain);
        Simulation::new(config, terrain, scene, backend, 7).unwrap()
    }

    #[test]
    fn test_scheduler_config_mirrors_audio_section() {
        let audio = AudioConfig::default();
        let sc = scheduler_config(&audio);
        assert_eq!(sc.trigger_radius, 10.0);
        assert_eq!(sc.spatial.max_distance, 10.0);
        assert_eq!(sc.phrase.notes_per_phrase, 5);
        assert_eq!(sc.phrase.envelope.floor, 0.01);
        assert_eq!(sc, SchedulerConfig::default());
    }

    #[test]
    fn test_walk_stays_in_bounds() {
        let config = small_config();
        let mut sim = simulation(&config, TracingAudioBackend::new());
        for _ in 0..2000 {
            sim.step();
            let p = sim.observer().state().position;
            assert!((0.0..=21.0).contains(&p.x), "x out of bounds: {}", p.x);
            assert!((0.0..=21.0).contains(&p.z), "z out of bounds: {}", p.z);
            assert_eq!(p.y, 5.0);
        }
    }

    #[test]
    fn test_walk_triggers_emitters_and_plays_phrases() {
        let config = small_config();
        let mut sim = simulation(&config, TracingAudioBackend::new());
        let summary = sim.run(1000).clone();

        assert_eq!(summary.ticks, 1000);
        assert!(summary.triggers > 0, "walk should pass near an emitter");
        assert_eq!(summary.tones_scheduled, summary.triggers * 5);
        assert_eq!(summary.tones_failed, 0);
        assert_eq!(summary.unavailable_ticks, 0);
        assert_eq!(sim.backend().tones_played(), summary.tones_scheduled);
    }

    #[test]
    fn test_cooldown_bounds_triggers_per_emitter() {
        let config = small_config();
        let mut sim = simulation(&config, TracingAudioBackend::new());
        let summary = sim.run(1000).clone();

        // 16 s of walking, at most one trigger per 4 s cooldown per emitter.
        let elapsed_ms = 1000.0 * TICK_MS;
        let per_emitter_bound = (elapsed_ms / config.audio.cooldown_min_ms).ceil() as u64;
        assert!(summary.triggers <= sim.registry().len() as u64 * per_emitter_bound);
    }

    #[test]
    fn test_unavailable_backend_is_not_fatal() {
        let config = small_config();
        let mut sim = simulation(&config, TracingAudioBackend::unavailable());
        let summary = sim.run(1000).clone();

        assert!(summary.triggers > 0, "cooldowns still advance");
        assert!(summary.unavailable_ticks > 0);
        assert_eq!(summary.tones_failed, summary.triggers * 5);
        assert_eq!(sim.backend().tones_played(), 0);
    }

    #[test]
    fn test_highlights_revert_after_deadline() {
        let config = small_config();
        let mut sim = simulation(&config, TracingAudioBackend::new());
        let mut fired_at = HashMap::new();
        let mut reverts = 0;

        for tick in 0..1000 {
            let now = f64::from(tick) * TICK_MS;
            let report = sim.step();
            for id in &report.reverted {
                let t = fired_at.remove(id).expect("only fired emitters revert");
                let held = now - t;
                assert!(
                    held >= config.audio.highlight_ms && held < config.audio.highlight_ms + TICK_MS,
                    "{id} highlighted for {held} ms"
                );
                assert!(!sim.scene().disc(*id).unwrap().active);
                reverts += 1;
            }
            for id in report.triggered {
                fired_at.insert(id, now);
                assert!(sim.scene().disc(id).unwrap().active);
            }
        }
        assert!(reverts > 0);
    }

    #[test]
    fn test_bad_binding_rejected() {
        let mut config = small_config();
        config.observer.keys.left = "hyper".to_string();
        let terrain = TerrainSynthesizer::new(NoiseField::new(0.5))
            .generate(&terrain_params(&config.world))
            .unwrap();
        let scene = SceneBuilder::new(1.0).build(&terrain);
        let result = Simulation::new(&config, terrain, scene, TracingAudioBackend::new(), 7);
        assert!(matches!(result, Err(DemoError::Bindings(_))));
    }
}
