//! Configuration structs with defaults, validation and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Terrain and emitter placement.
    pub world: WorldConfig,
    /// Proximity triggering and phrase synthesis.
    pub audio: AudioConfig,
    /// Observer movement and key bindings.
    pub observer: ObserverConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid cells along X.
    pub width: u32,
    /// Grid cells along Z.
    pub depth: u32,
    /// Edge length of one voxel in world units.
    pub block_size: f64,
    /// Noise-to-height multiplier.
    pub height_scale: f64,
    /// Cell-to-noise-space multiplier.
    pub noise_scale: f64,
    /// An emitter is placed on every cell whose x and z are multiples of this.
    pub emitter_spacing: u32,
    /// Noise seed. A random seed is drawn at startup when unset.
    pub seed: Option<f64>,
}

/// Audio scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Emitters strictly closer than this to the observer may trigger.
    pub trigger_radius: f64,
    /// Minimum cooldown after a trigger, in milliseconds.
    pub cooldown_min_ms: f64,
    /// Upper bound of the uniform random cooldown extension, in milliseconds.
    pub cooldown_jitter_ms: f64,
    pub notes_per_phrase: usize,
    /// Seconds each note sounds.
    pub note_duration_s: f64,
    /// Seconds between note onsets.
    pub note_spacing_s: f64,
    /// Note frequencies in Hz, chosen uniformly per note.
    pub scale: Vec<f64>,
    /// Gain at note onset.
    pub peak_gain: f64,
    /// Gain the envelope decays to by the end of the note.
    pub floor_gain: f64,
    /// How long a triggered emitter stays highlighted, in milliseconds.
    pub highlight_ms: f64,
}

/// Observer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// World units moved per tick per held direction.
    pub speed: f64,
    /// Radians of rotation per unit of pointer motion.
    pub look_sensitivity: f64,
    /// Start position. Defaults to `(width / 2, 20, depth * 1.5)` when unset.
    pub start_position: Option<[f64; 3]>,
    /// Movement key names.
    pub keys: KeyBindingConfig,
}

/// Movement key names, resolved by the input layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyBindingConfig {
    pub forward: String,
    pub back: String,
    pub left: String,
    pub right: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100,
            depth: 100,
            block_size: 1.0,
            height_scale: 10.0,
            noise_scale: 0.08,
            emitter_spacing: 7,
            seed: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            trigger_radius: 10.0,
            cooldown_min_ms: 4000.0,
            cooldown_jitter_ms: 3000.0,
            notes_per_phrase: 5,
            note_duration_s: 0.25,
            note_spacing_s: 0.3,
            scale: vec![261.63, 293.66, 329.63, 392.00, 440.00, 493.88, 523.25],
            peak_gain: 0.2,
            floor_gain: 0.01,
            highlight_ms: 800.0,
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            speed: 0.3,
            look_sensitivity: 0.002,
            start_position: None,
            keys: KeyBindingConfig::default(),
        }
    }
}

impl Default for KeyBindingConfig {
    fn default() -> Self {
        Self {
            forward: "w".to_string(),
            back: "s".to_string(),
            left: "a".to_string(),
            right: "d".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Derived values / validation ---

fn finite_non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be finite and >= 0, got {value}"),
        ))
    }
}

fn finite_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

impl Config {
    /// Default config directory: `<platform config dir>/tonefield`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("tonefield"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Observer start position, falling back to a point south of the world
    /// looking back across it.
    pub fn start_position(&self) -> [f64; 3] {
        self.observer.start_position.unwrap_or([
            f64::from(self.world.width) / 2.0,
            20.0,
            f64::from(self.world.depth) * 1.5,
        ])
    }

    /// Reject values the world and scheduler cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 {
            return Err(ConfigError::invalid("world.width", "must be at least 1"));
        }
        if world.depth == 0 {
            return Err(ConfigError::invalid("world.depth", "must be at least 1"));
        }
        if world.emitter_spacing == 0 {
            return Err(ConfigError::invalid(
                "world.emitter_spacing",
                "must be at least 1",
            ));
        }
        finite_positive("world.block_size", world.block_size)?;
        finite_non_negative("world.height_scale", world.height_scale)?;
        finite_non_negative("world.noise_scale", world.noise_scale)?;
        if world.seed.is_some_and(|seed| !seed.is_finite()) {
            return Err(ConfigError::invalid("world.seed", "must be finite"));
        }

        let audio = &self.audio;
        finite_positive("audio.trigger_radius", audio.trigger_radius)?;
        finite_non_negative("audio.cooldown_min_ms", audio.cooldown_min_ms)?;
        finite_non_negative("audio.cooldown_jitter_ms", audio.cooldown_jitter_ms)?;
        if audio.notes_per_phrase == 0 {
            return Err(ConfigError::invalid(
                "audio.notes_per_phrase",
                "must be at least 1",
            ));
        }
        finite_positive("audio.note_duration_s", audio.note_duration_s)?;
        finite_non_negative("audio.note_spacing_s", audio.note_spacing_s)?;
        if audio.scale.is_empty() {
            return Err(ConfigError::invalid("audio.scale", "must not be empty"));
        }
        for &freq in &audio.scale {
            finite_positive("audio.scale", freq)?;
        }
        // Exponential decay cannot reach zero.
        finite_positive("audio.floor_gain", audio.floor_gain)?;
        finite_positive("audio.peak_gain", audio.peak_gain)?;
        finite_non_negative("audio.highlight_ms", audio.highlight_ms)?;

        let observer = &self.observer;
        finite_non_negative("observer.speed", observer.speed)?;
        if !observer.look_sensitivity.is_finite() {
            return Err(ConfigError::invalid(
                "observer.look_sensitivity",
                "must be finite",
            ));
        }
        if observer
            .start_position
            .is_some_and(|start| start.iter().any(|c| !c.is_finite()))
        {
            return Err(ConfigError::invalid(
                "observer.start_position",
                "must be finite",
            ));
        }

        Ok(())
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
