//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tonefield command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tonefield", about = "Procedural voxel terrain with proximity audio")]
pub struct CliArgs {
    /// World width in cells.
    #[arg(long)]
    pub width: Option<u32>,

    /// World depth in cells.
    #[arg(long)]
    pub depth: Option<u32>,

    /// Noise seed.
    #[arg(long)]
    pub seed: Option<f64>,

    /// Emitter trigger radius in world units.
    #[arg(long)]
    pub trigger_radius: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run without an audio device. Phrases are still scheduled and fail.
    #[arg(long)]
    pub no_audio: bool,

    /// Number of simulated ticks in the scripted walk.
    #[arg(long, default_value_t = 3000)]
    pub ticks: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.world.width = w;
        }
        if let Some(d) = args.depth {
            self.world.depth = d;
        }
        if let Some(seed) = args.seed {
            self.world.seed = Some(seed);
        }
        if let Some(radius) = args.trigger_radius {
            self.audio.trigger_radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(21),
            seed: Some(7.0),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.width, 21);
        assert_eq!(config.world.seed, Some(7.0));
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.world.depth, 100);
        assert_eq!(config.audio.trigger_radius, 10.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "tonefield",
            "--depth",
            "30",
            "--trigger-radius",
            "4.5",
            "--ticks",
            "10",
            "--no-audio",
        ])
        .unwrap();
        assert_eq!(args.depth, Some(30));
        assert_eq!(args.trigger_radius, Some(4.5));
        assert_eq!(args.ticks, 10);
        assert!(args.no_audio);
        assert!(args.width.is_none());
    }

    #[test]
    fn test_cli_default_ticks() {
        let args = CliArgs::try_parse_from(["tonefield"]).unwrap();
        assert_eq!(args.ticks, 3000);
    }
}
