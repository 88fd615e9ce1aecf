//! Procedural voxel terrain: seeded gradient noise, heightmap synthesis,
//! material banding, and emitter site placement.

mod error;
mod grid;
mod material;
mod noise;
mod synth;

pub use error::TerrainError;
pub use grid::{VoxelRecord, WorldGrid};
pub use material::{VoxelMaterial, classify_layer};
pub use noise::{NoiseField, fade, lerp};
pub use synth::{
    EMITTER_VERTICAL_OFFSET, EmitterId, EmitterSite, GeneratedTerrain, TerrainParams,
    TerrainSynthesizer, column_height,
};
