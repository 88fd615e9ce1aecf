//! Voxel materials and the column banding rule.

/// Material tag carried by every voxel in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoxelMaterial {
    /// Top voxel of a column.
    Surface,
    /// The two voxels directly under the surface.
    Subsurface,
    /// Everything deeper.
    Deep,
}

impl VoxelMaterial {
    /// All materials, in top-down order.
    pub const ALL: [VoxelMaterial; 3] = [Self::Surface, Self::Subsurface, Self::Deep];

    /// Human-readable name used in logs and scene descriptions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Surface => "grass",
            Self::Subsurface => "dirt",
            Self::Deep => "stone",
        }
    }

    /// Display color as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        match self {
            Self::Surface => 0x228b22,
            Self::Subsurface => 0x8b4513,
            Self::Deep => 0x808080,
        }
    }
}

/// Classify `layer` of a column whose top voxel sits at `column_height`.
///
/// Layers above the column are not voxels; callers only pass
/// `layer <= column_height`.
pub fn classify_layer(layer: u32, column_height: u32) -> VoxelMaterial {
    if layer == column_height {
        VoxelMaterial::Surface
    } else if layer + 2 < column_height {
        VoxelMaterial::Deep
    } else {
        VoxelMaterial::Subsurface
    }
}
