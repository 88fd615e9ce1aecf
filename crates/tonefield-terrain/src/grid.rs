//! The generated heightmap and its voxel view.

use crate::material::{VoxelMaterial, classify_layer};

/// One unit voxel of the landscape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelRecord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub material: VoxelMaterial,
}

impl VoxelRecord {
    /// World-space centre of this voxel for a renderer using `block_size` cubes.
    pub fn world_position(&self, block_size: f64) -> glam::DVec3 {
        glam::DVec3::new(self.x as f64, self.y as f64, self.z as f64) * block_size
    }
}

/// Fixed-size grid of column heights.
///
/// Cells are stored x-major: `index = x * depth + z`. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldGrid {
    width: u32,
    depth: u32,
    heights: Vec<u32>,
}

impl WorldGrid {
    /// Wrap a height buffer. `heights.len()` must equal `width * depth`.
    pub(crate) fn from_heights(width: u32, depth: u32, heights: Vec<u32>) -> Self {
        debug_assert_eq!(heights.len(), width as usize * depth as usize);
        Self {
            width,
            depth,
            heights,
        }
    }

    /// Cells along x.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Cells along z.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Height of the top voxel at `(x, z)`, or `None` outside the grid.
    pub fn column_height(&self, x: u32, z: u32) -> Option<u32> {
        if x >= self.width || z >= self.depth {
            return None;
        }
        Some(self.heights[x as usize * self.depth as usize + z as usize])
    }

    /// Iterate `(x, z, column_height)` for every cell in x-major order.
    pub fn columns(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        let depth = self.depth as usize;
        self.heights
            .iter()
            .enumerate()
            .map(move |(i, &h)| ((i / depth) as u32, (i % depth) as u32, h))
    }

    /// Iterate every voxel of every column, bottom-up within a column.
    pub fn voxels(&self) -> impl Iterator<Item = VoxelRecord> + '_ {
        self.columns().flat_map(|(x, z, h)| {
            (0..=h).map(move |y| VoxelRecord {
                x,
                y,
                z,
                material: classify_layer(y, h),
            })
        })
    }

    /// Total number of voxels `voxels()` yields.
    pub fn voxel_count(&self) -> u64 {
        self.heights.iter().map(|&h| h as u64 + 1).sum()
    }

    /// Tallest column in the grid.
    pub fn max_height(&self) -> u32 {
        self.heights.iter().copied().max().unwrap_or(0)
    }
}
