//! Renderer-agnostic scene description: one cube per voxel and one marker
//! disc per emitter. Discs double as the scheduler's visual feedback.

use std::collections::HashMap;

use glam::DVec3;
use tonefield_audio::VisualFeedback;
use tonefield_terrain::{EmitterId, GeneratedTerrain, VoxelMaterial};
use tracing::trace;

pub const SKY_COLOR: u32 = 0x87ceeb;
pub const SUN_POSITION: DVec3 = DVec3::new(100.0, 200.0, 100.0);

pub const DISC_RADIUS: f64 = 0.5;
pub const DISC_SEGMENTS: u32 = 16;
pub const DISC_COLOR: u32 = 0xff00ff;
pub const DISC_ACTIVE_COLOR: u32 = 0xffff00;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeInstance {
    /// Cube center.
    pub position: DVec3,
    pub size: f64,
    pub material: VoxelMaterial,
    pub color: u32,
}

/// Flat circle lying in the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscInstance {
    pub emitter: EmitterId,
    pub center: DVec3,
    pub normal: DVec3,
    pub radius: f64,
    pub segments: u32,
    pub color: u32,
    pub active: bool,
}

#[derive(Debug, Default)]
pub struct Scene {
    pub sky_color: u32,
    pub sun_position: DVec3,
    pub cubes: Vec<CubeInstance>,
    pub discs: Vec<DiscInstance>,
    disc_index: HashMap<EmitterId, usize>,
}

impl Scene {
    pub fn disc(&self, id: EmitterId) -> Option<&DiscInstance> {
        self.disc_index.get(&id).map(|&i| &self.discs[i])
    }

    /// Discs currently showing the active color.
    pub fn active_discs(&self) -> usize {
        self.discs.iter().filter(|d| d.active).count()
    }

    /// Cube count per material, in [`VoxelMaterial::ALL`] order.
    pub fn material_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for cube in &self.cubes {
            if let Some(slot) = VoxelMaterial::ALL.iter().position(|&m| m == cube.material) {
                counts[slot] += 1;
            }
        }
        counts
    }
}

impl VisualFeedback for Scene {
    fn set_emitter_active(&mut self, id: EmitterId, active: bool) {
        let Some(&i) = self.disc_index.get(&id) else {
            return;
        };
        let disc = &mut self.discs[i];
        disc.active = active;
        disc.color = if active { DISC_ACTIVE_COLOR } else { DISC_COLOR };
        trace!(%id, active, "disc highlight");
    }
}

/// Lays generated terrain out in render units (grid units × block size).
pub struct SceneBuilder {
    block_size: f64,
}

impl SceneBuilder {
    pub fn new(block_size: f64) -> Self {
        Self { block_size }
    }

    pub fn build(&self, terrain: &GeneratedTerrain) -> Scene {
        let cubes = terrain
            .grid
            .voxels()
            .map(|voxel| CubeInstance {
                position: voxel.world_position(self.block_size),
                size: self.block_size,
                material: voxel.material,
                color: voxel.material.color(),
            })
            .collect();

        let mut discs = Vec::with_capacity(terrain.emitters.len());
        let mut disc_index = HashMap::with_capacity(terrain.emitters.len());
        for site in &terrain.emitters {
            disc_index.insert(site.id, discs.len());
            discs.push(DiscInstance {
                emitter: site.id,
                center: site.position * self.block_size,
                normal: DVec3::Y,
                radius: DISC_RADIUS,
                segments: DISC_SEGMENTS,
                color: DISC_COLOR,
                active: false,
            });
        }

        Scene {
            sky_color: SKY_COLOR,
            sun_position: SUN_POSITION,
            cubes,
            discs,
            disc_index,
        }
    }
}
