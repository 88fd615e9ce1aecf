//! Headless tonefield demo.
//!
//! Generates the terrain and its emitters, builds the scene description, and
//! walks an observer across the world on a fixed 16 ms tick while a logging
//! audio backend reports every phrase.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p tonefield-demo -- --seed 0.42 --ticks 6000`.

mod backend;
mod error;
mod scene;
mod sim;
mod walk;

use std::collections::BTreeSet;
use std::process::ExitCode;

use clap::Parser;
use rand::Rng;
use tonefield_config::{CliArgs, Config};
use tonefield_terrain::{NoiseField, TerrainSynthesizer, VoxelMaterial};
use tracing::{debug, error, info};

use crate::backend::TracingAudioBackend;
use crate::error::DemoError;
use crate::scene::{Scene, SceneBuilder};
use crate::sim::{Simulation, WalkSummary, terrain_params};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone() {
        Some(dir) => dir,
        None => match Config::default_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprintln!("tonefield: {e}; pass --config <dir>");
                return ExitCode::FAILURE;
            }
        },
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tonefield_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config, &args) {
        Ok(summary) => {
            info!(
                triggers = summary.triggers,
                distinct_emitters = summary.distinct_emitters.len(),
                tones = summary.tones_scheduled,
                failed = summary.tones_failed,
                x = summary.final_position.x,
                z = summary.final_position.z,
                "demo complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, args: &CliArgs) -> Result<WalkSummary, DemoError> {
    config.validate()?;

    let seed = config
        .world
        .seed
        .unwrap_or_else(|| rand::rng().random::<f64>());
    info!(seed, "seeding noise field");

    let terrain =
        TerrainSynthesizer::new(NoiseField::new(seed)).generate(&terrain_params(&config.world))?;

    let scene = SceneBuilder::new(config.world.block_size).build(&terrain);
    log_scene(&scene);

    let backend = if args.no_audio {
        TracingAudioBackend::unavailable()
    } else {
        TracingAudioBackend::new()
    };
    let mut sim = Simulation::new(config, terrain, scene, backend, seed.to_bits())?;
    let summary = sim.run(args.ticks).clone();

    let observer = sim.observer().state();
    info!(
        emitters = sim.registry().len(),
        tones_played = sim.backend().tones_played(),
        still_highlighted = sim.scene().active_discs(),
        yaw = observer.yaw,
        listener = ?sim.backend().listener(),
        "final state"
    );
    Ok(summary)
}

/// Report what a renderer would draw.
fn log_scene(scene: &Scene) {
    for (material, count) in VoxelMaterial::ALL.iter().zip(scene.material_counts()) {
        info!(material = material.name(), count, "voxels");
    }

    let top = scene
        .cubes
        .iter()
        .map(|c| c.position.y + c.size / 2.0)
        .fold(0.0, f64::max);
    let palette: BTreeSet<String> = scene
        .cubes
        .iter()
        .map(|c| format!("#{:06x}", c.color))
        .collect();
    info!(
        cubes = scene.cubes.len(),
        discs = scene.discs.len(),
        top,
        ?palette,
        sky = format!("#{:06x}", scene.sky_color),
        sun = ?scene.sun_position,
        "scene built"
    );

    for disc in &scene.discs {
        debug!(
            emitter = %disc.emitter,
            center = ?disc.center,
            normal = ?disc.normal,
            radius = disc.radius,
            segments = disc.segments,
            color = format!("#{:06x}", disc.color),
            "emitter disc"
        );
    }
}
