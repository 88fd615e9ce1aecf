//! Heightmap synthesis and emitter site placement.
//!
//! Every grid cell samples the noise field once, maps the sample to an
//! integer column height, and (on a regular lattice) becomes an audio emitter
//! site hovering just above its surface voxel.

use glam::DVec3;
use tracing::{debug, info};

use crate::error::TerrainError;
use crate::grid::WorldGrid;
use crate::noise::NoiseField;

/// Height above the surface voxel at which emitter sites float.
pub const EMITTER_VERTICAL_OFFSET: f64 = 1.1;

/// Grids smaller than this many cells are generated on the calling thread.
const PARALLEL_THRESHOLD: usize = 4096;

/// Inputs to [`TerrainSynthesizer::generate`].
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainParams {
    /// Cells along x. Must be at least 1.
    pub width: u32,
    /// Cells along z. Must be at least 1.
    pub depth: u32,
    /// Height of a column whose noise sample is +1. Zero gives flat terrain.
    pub height_scale: f64,
    /// Noise-space distance between neighbouring cells. Zero gives flat terrain.
    pub noise_scale: f64,
    /// Lattice spacing of emitter sites, in cells. Must be at least 1.
    pub emitter_spacing: u32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 100,
            depth: 100,
            height_scale: 10.0,
            noise_scale: 0.08,
            emitter_spacing: 7,
        }
    }
}

impl TerrainParams {
    /// Reject parameters that cannot describe a world.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width == 0 {
            return Err(TerrainError::invalid("width", "must be at least 1"));
        }
        if self.depth == 0 {
            return Err(TerrainError::invalid("depth", "must be at least 1"));
        }
        if self.emitter_spacing == 0 {
            return Err(TerrainError::invalid("emitter_spacing", "must be at least 1"));
        }
        if !self.height_scale.is_finite() || self.height_scale < 0.0 {
            return Err(TerrainError::invalid(
                "height_scale",
                format!("must be finite and non-negative, got {}", self.height_scale),
            ));
        }
        if !self.noise_scale.is_finite() || self.noise_scale < 0.0 {
            return Err(TerrainError::invalid(
                "noise_scale",
                format!("must be finite and non-negative, got {}", self.noise_scale),
            ));
        }
        Ok(())
    }
}

/// Stable identifier of an emitter site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub u32);

impl std::fmt::Display for EmitterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "emitter#{}", self.0)
    }
}

/// A fixed world position that can play a phrase when approached.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterSite {
    pub id: EmitterId,
    pub position: DVec3,
    /// Earliest scheduler time (ms) at which the site may fire again.
    pub next_eligible_time: f64,
}

impl EmitterSite {
    /// Whether the cooldown has elapsed at scheduler time `now` (ms).
    pub fn is_eligible(&self, now: f64) -> bool {
        self.next_eligible_time <= now
    }
}

/// Output of one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedTerrain {
    pub grid: WorldGrid,
    /// Sites in creation order: x-major, then z.
    pub emitters: Vec<EmitterSite>,
}

/// Height of the column at cell `(x, z)`.
///
/// Maps the `[-1, 1]` sample onto `[0, height_scale]` and floors it. The
/// result is clamped at zero so a field that overshoots its nominal range
/// never produces a negative column.
pub fn column_height(noise: &NoiseField, x: u32, z: u32, params: &TerrainParams) -> u32 {
    let n = noise.sample(x as f64 * params.noise_scale, z as f64 * params.noise_scale);
    (((n + 1.0) / 2.0) * params.height_scale).floor().max(0.0) as u32
}

/// Builds a [`GeneratedTerrain`] from a noise field.
pub struct TerrainSynthesizer {
    noise: NoiseField,
    worker_threads: usize,
}

impl TerrainSynthesizer {
    /// Create a synthesizer that splits large grids across all CPU cores.
    pub fn new(noise: NoiseField) -> Self {
        Self {
            noise,
            worker_threads: num_cpus::get().max(1),
        }
    }

    /// Override the worker thread count. `0` is treated as `1`.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }

    /// The field this synthesizer samples.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Generate the world grid and its emitter sites.
    ///
    /// Output depends only on the noise seed and `params`; the thread count
    /// never changes the result.
    pub fn generate(&self, params: &TerrainParams) -> Result<GeneratedTerrain, TerrainError> {
        params.validate()?;

        let heights = self.build_heights(params);
        let grid = WorldGrid::from_heights(params.width, params.depth, heights);
        let emitters = place_emitters(&grid, params.emitter_spacing);

        info!(
            width = params.width,
            depth = params.depth,
            voxels = grid.voxel_count(),
            max_height = grid.max_height(),
            "terrain generated with {} emitter sites",
            emitters.len()
        );

        Ok(GeneratedTerrain { grid, emitters })
    }

    fn build_heights(&self, params: &TerrainParams) -> Vec<u32> {
        let depth = params.depth as usize;
        let cells = params.width as usize * depth;
        let mut heights = vec![0u32; cells];

        let threads = if cells < PARALLEL_THRESHOLD {
            1
        } else {
            self.worker_threads.min(params.width as usize)
        };

        if threads <= 1 {
            fill_rows(&self.noise, params, 0, &mut heights);
            return heights;
        }

        let rows_per_band = (params.width as usize).div_ceil(threads);
        debug!(threads, rows_per_band, "generating terrain in parallel");

        std::thread::scope(|scope| {
            for (band, slice) in heights.chunks_mut(rows_per_band * depth).enumerate() {
                let noise = &self.noise;
                let first_row = (band * rows_per_band) as u32;
                scope.spawn(move || fill_rows(noise, params, first_row, slice));
            }
        });

        heights
    }
}

/// Fill consecutive x-rows starting at `first_row` into `out`.
fn fill_rows(noise: &NoiseField, params: &TerrainParams, first_row: u32, out: &mut [u32]) {
    let depth = params.depth as usize;
    for (offset, slot) in out.iter_mut().enumerate() {
        let x = first_row + (offset / depth) as u32;
        let z = (offset % depth) as u32;
        *slot = column_height(noise, x, z, params);
    }
}

fn place_emitters(grid: &WorldGrid, spacing: u32) -> Vec<EmitterSite> {
    let mut next_id = 0u32;
    grid.columns()
        .filter(|&(x, z, _)| x % spacing == 0 && z % spacing == 0)
        .map(|(x, z, h)| {
            let site = EmitterSite {
                id: EmitterId(next_id),
                position: DVec3::new(x as f64, h as f64 + EMITTER_VERTICAL_OFFSET, z as f64),
                next_eligible_time: 0.0,
            };
            next_id += 1;
            site
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::VoxelMaterial;

    fn params(width: u32, depth: u32, spacing: u32) -> TerrainParams {
        TerrainParams {
            width,
            depth,
            height_scale: 10.0,
            noise_scale: 0.08,
            emitter_spacing: spacing,
        }
    }

    fn synth(seed: f64) -> TerrainSynthesizer {
        TerrainSynthesizer::new(NoiseField::new(seed))
    }

    #[test]
    fn test_site_eligible_once_cooldown_reached() {
        let mut site = EmitterSite {
            id: EmitterId(0),
            position: DVec3::ZERO,
            next_eligible_time: 0.0,
        };
        assert!(site.is_eligible(0.0), "fresh sites are eligible at time zero");

        site.next_eligible_time = 5000.0;
        assert!(!site.is_eligible(4999.0));
        assert!(site.is_eligible(5000.0), "boundary is inclusive");
    }

    #[test]
    fn test_same_seed_reproduces_terrain() {
        let p = params(10, 10, 7);
        let a = synth(42.0).generate(&p).unwrap();
        let b = synth(42.0).generate(&p).unwrap();
        assert_eq!(a.grid, b.grid, "grids differ across runs");
        assert_eq!(a.emitters, b.emitters, "emitter sites differ across runs");
        assert_eq!(a.emitters.len(), 4);
    }

    #[test]
    fn test_emitter_lattice_21_by_21() {
        let terrain = synth(3.0).generate(&params(21, 21, 7)).unwrap();
        assert_eq!(terrain.emitters.len(), 9);

        let coords: Vec<(f64, f64)> = terrain
            .emitters
            .iter()
            .map(|e| (e.position.x, e.position.z))
            .collect();
        for x in [0.0, 7.0, 14.0] {
            for z in [0.0, 7.0, 14.0] {
                assert!(coords.contains(&(x, z)), "missing site at ({x}, {z})");
            }
        }
    }

    #[test]
    fn test_emitters_float_above_surface() {
        let terrain = synth(11.0).generate(&params(15, 15, 5)).unwrap();
        for site in &terrain.emitters {
            let h = terrain
                .grid
                .column_height(site.position.x as u32, site.position.z as u32)
                .unwrap();
            assert!((site.position.y - (h as f64 + EMITTER_VERTICAL_OFFSET)).abs() < 1e-12);
            assert_eq!(site.next_eligible_time, 0.0);
        }
    }

    #[test]
    fn test_emitter_ids_unique_and_sequential() {
        let terrain = synth(5.0).generate(&params(30, 30, 4)).unwrap();
        for (i, site) in terrain.emitters.iter().enumerate() {
            assert_eq!(site.id, EmitterId(i as u32));
        }
    }

    #[test]
    fn test_spacing_one_places_site_on_every_cell() {
        let terrain = synth(5.0).generate(&params(4, 3, 1)).unwrap();
        assert_eq!(terrain.emitters.len(), 12);
    }

    #[test]
    fn test_banding_on_generated_columns() {
        let terrain = synth(77.0)
            .generate(&TerrainParams {
                height_scale: 24.0,
                ..params(20, 20, 7)
            })
            .unwrap();
        for voxel in terrain.grid.voxels() {
            let h = terrain.grid.column_height(voxel.x, voxel.z).unwrap();
            let expected = if voxel.y == h {
                VoxelMaterial::Surface
            } else if (voxel.y as i64) < h as i64 - 2 {
                VoxelMaterial::Deep
            } else {
                VoxelMaterial::Subsurface
            };
            assert_eq!(voxel.material, expected, "wrong band at {voxel:?} (h={h})");
        }
    }

    #[test]
    fn test_heights_within_scale() {
        let p = params(50, 50, 7);
        let terrain = synth(9.0).generate(&p).unwrap();
        for (_, _, h) in terrain.grid.columns() {
            assert!(h as f64 <= p.height_scale);
        }
    }

    #[test]
    fn test_zero_scales_produce_flat_world() {
        let flat_height = synth(1.0)
            .generate(&TerrainParams {
                height_scale: 0.0,
                ..params(8, 8, 3)
            })
            .unwrap();
        assert!(flat_height.grid.columns().all(|(_, _, h)| h == 0));

        // Every cell samples the origin lattice point, which is always zero.
        let flat_noise = synth(1.0)
            .generate(&TerrainParams {
                noise_scale: 0.0,
                ..params(8, 8, 3)
            })
            .unwrap();
        assert!(flat_noise.grid.columns().all(|(_, _, h)| h == 5));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let p = params(96, 80, 7);
        let sequential = synth(123.0).with_worker_threads(1).generate(&p).unwrap();
        let parallel = synth(123.0).with_worker_threads(6).generate(&p).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let s = synth(1.0);
        assert!(matches!(
            s.generate(&params(0, 10, 7)),
            Err(TerrainError::InvalidParams { name: "width", .. })
        ));
        assert!(matches!(
            s.generate(&params(10, 0, 7)),
            Err(TerrainError::InvalidParams { name: "depth", .. })
        ));
        assert!(matches!(
            s.generate(&params(10, 10, 0)),
            Err(TerrainError::InvalidParams {
                name: "emitter_spacing",
                ..
            })
        ));
        assert!(
            s.generate(&TerrainParams {
                noise_scale: f64::NAN,
                ..params(10, 10, 7)
            })
            .is_err()
        );
        assert!(
            s.generate(&TerrainParams {
                height_scale: -1.0,
                ..params(10, 10, 7)
            })
            .is_err()
        );
    }
}
