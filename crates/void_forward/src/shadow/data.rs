//! GPU Shadow Data Structures
//!
//! Pod snapshot of the shadow globals for hosts that upload a uniform buffer
//! instead of consuming named globals.

use super::atlas::ShadowAtlasState;
use super::{MAX_CASCADES, MAX_TILES};

/// Shadow globals as laid out in a uniform buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuShadowUniforms {
    /// World to atlas matrices per tile (column-major)
    pub matrices: [[[f32; 4]; 4]; MAX_TILES],

    /// Cascade culling spheres (xyz = center, w = squared radius)
    pub culling_spheres: [[f32; 4]; MAX_CASCADES],

    /// Active cascades (0 when no light is shadowed)
    pub cascade_count: i32,

    /// Maximum shadow distance
    pub shadow_distance: f32,

    /// Padding to align to 16 bytes
    pub _pad: [f32; 2],
}

impl Default for GpuShadowUniforms {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

impl GpuShadowUniforms {
    /// Size in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    /// Pack the atlas state
    pub fn from_state(state: &ShadowAtlasState, cascade_count: u32, shadow_distance: f32) -> Self {
        let mut uniforms = Self {
            cascade_count: cascade_count as i32,
            shadow_distance,
            ..Default::default()
        };

        for (dst, src) in uniforms.matrices.iter_mut().zip(state.matrices.iter()) {
            *dst = src.to_cols_array_2d();
        }
        let spheres = state.cascade_culling_spheres.iter();
        for (dst, src) in uniforms.culling_spheres.iter_mut().zip(spheres) {
            *dst = src.to_array();
        }

        uniforms
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
