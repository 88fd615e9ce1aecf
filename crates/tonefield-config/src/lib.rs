//! Configuration for tonefield.
//!
//! Settings persist to disk as `config.ron`, missing fields fall back to
//! defaults, and clap CLI arguments override what was loaded. Values are
//! checked once at startup with [`Config::validate`].

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{AudioConfig, Config, DebugConfig, KeyBindingConfig, ObserverConfig, WorldConfig};
pub use error::ConfigError;
