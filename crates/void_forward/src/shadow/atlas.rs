//! Shadow Atlas Layout
//!
//! The atlas is one square depth texture split into an equal grid of tiles,
//! one tile per light cascade. Tiles are assigned row-major: light `n` owns
//! tiles `n * cascade_count .. (n + 1) * cascade_count`.
//!
//! # Grid size
//!
//! | tiles  | split | grid |
//! |--------|-------|------|
//! | 1      | 1     | 1x1  |
//! | 2..=4  | 2     | 2x2  |
//! | 5..=16 | 4     | 4x4  |
//!
//! Atlas sizes are powers of two of at least 256, so every split divides the
//! atlas without remainder.

use glam::{Mat4, Vec2, Vec4};
use serde::{Deserialize, Serialize};

use super::{MAX_CASCADES, MAX_TILES};
use crate::resource::Rect;

/// Tiles per atlas side for a tile count
pub fn split_for_tiles(tiles: u32) -> u32 {
    debug_assert!(tiles as usize <= MAX_TILES, "atlas cannot hold {tiles} tiles");
    if tiles <= 1 {
        1
    } else if tiles <= 4 {
        2
    } else {
        4
    }
}

/// Atlas subdivision for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasLayout {
    /// Atlas width and height in pixels
    pub atlas_size: u32,
    /// Tiles in use
    pub tile_count: u32,
    /// Tiles per side
    pub split: u32,
    /// Tile width and height in pixels
    pub tile_size: u32,
}

impl AtlasLayout {
    /// Lay out `tile_count` tiles in an atlas of `atlas_size` pixels
    pub fn new(atlas_size: u32, tile_count: u32) -> Self {
        let split = split_for_tiles(tile_count);
        debug_assert_eq!(atlas_size % split, 0, "atlas size {atlas_size} not divisible by {split}");
        Self {
            atlas_size,
            tile_count,
            split,
            tile_size: atlas_size / split,
        }
    }

    /// Grid position of a tile (column, row)
    pub fn tile_offset(&self, tile_index: u32) -> Vec2 {
        Vec2::new((tile_index % self.split) as f32, (tile_index / self.split) as f32)
    }

    /// Pixel viewport of a tile
    pub fn tile_viewport(&self, tile_index: u32) -> Rect {
        let offset = self.tile_offset(tile_index) * self.tile_size as f32;
        Rect::new(offset.x, offset.y, self.tile_size as f32, self.tile_size as f32)
    }
}

/// Remap a light view-projection matrix from clip space to atlas space
///
/// Clip-space xy in [-1, 1] becomes texture coordinates within the tile at
/// grid position `offset`; clip depth becomes [0, 1]. With reversed depth the
/// depth row is negated first.
pub fn atlas_matrix(mut m: Mat4, offset: Vec2, split: u32, reversed_z: bool) -> Mat4 {
    if reversed_z {
        m.x_axis.z = -m.x_axis.z;
        m.y_axis.z = -m.y_axis.z;
        m.z_axis.z = -m.z_axis.z;
        m.w_axis.z = -m.w_axis.z;
    }

    let scale = 1.0 / split as f32;
    let row_w = m.row(3);
    let row_x = (0.5 * (m.row(0) + row_w) + offset.x * row_w) * scale;
    let row_y = (0.5 * (m.row(1) + row_w) + offset.y * row_w) * scale;
    let row_z = 0.5 * (m.row(2) + row_w);

    Mat4::from_cols(row_x, row_y, row_z, row_w).transpose()
}

/// State of the temporary atlas render target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtlasTarget {
    /// Nothing allocated
    #[default]
    Released,
    /// 1x1 placeholder, bound when no light casts shadows
    Dummy,
    /// Full atlas of the given size
    Atlas { size: u32 },
}

impl AtlasTarget {
    pub fn is_allocated(&self) -> bool {
        !matches!(self, Self::Released)
    }

    /// Pixel size of the allocated target
    pub fn size(&self) -> Option<u32> {
        match self {
            Self::Released => None,
            Self::Dummy => Some(1),
            Self::Atlas { size } => Some(*size),
        }
    }
}

/// Shadow globals written while rendering the atlas
///
/// Arrays are reused across frames. Only the prefix covered by the current
/// frame's tile count is meaningful.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShadowAtlasState {
    /// Cascade culling spheres (xyz = center, w = squared radius)
    pub cascade_culling_spheres: [Vec4; MAX_CASCADES],

    /// World to atlas matrices, indexed by tile
    pub matrices: [Mat4; MAX_TILES],

    /// Layout of the last rendered atlas
    pub layout: Option<AtlasLayout>,
}

impl Default for ShadowAtlasState {
    fn default() -> Self {
        Self {
            cascade_culling_spheres: [Vec4::ZERO; MAX_CASCADES],
            matrices: [Mat4::IDENTITY; MAX_TILES],
            layout: None,
        }
    }
}

impl ShadowAtlasState {
    /// Store a cascade's culling sphere, squaring the radius
    pub fn record_culling_sphere(&mut self, cascade: usize, sphere: Vec4) {
        let mut sphere = sphere;
        sphere.w *= sphere.w;
        self.cascade_culling_spheres[cascade] = sphere;
    }
}
