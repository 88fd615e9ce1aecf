//! Top-level demo errors.

use tonefield_audio::RegistryError;
use tonefield_config::ConfigError;
use tonefield_input::BindingError;
use tonefield_terrain::TerrainError;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("bad key binding: {0}")]
    Bindings(#[from] BindingError),
}
