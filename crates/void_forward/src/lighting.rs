//! Directional Light Aggregation
//!
//! Scans the culled lights once per camera, keeps up to
//! [`MAX_DIRECTIONAL_LIGHTS`] directional lights in encounter order and
//! publishes their color, direction and shadow data as shader globals.
//! Point, spot and area lights are ignored.
//!
//! The three arrays are index-aligned: slot `i` describes the same light in
//! each, and its shadow data points at that light's first atlas tile.

use glam::Vec4;

use crate::command::CommandBuffer;
use crate::host::{CullingResults, LightType, RenderContext, VisibleLight};
use crate::resource::ids;
use crate::settings::ShadowSettings;
use crate::shadow::Shadows;

/// Maximum directional lights passed to shaders
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

const BUFFER_NAME: &str = "Lighting";

/// GPU-ready directional light arrays
///
/// Matches the shader globals with std140-compatible alignment.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuDirectionalLights {
    /// Lights in use
    pub count: i32,
    /// Padding for alignment
    pub _pad: [i32; 3],
    /// Color scaled by intensity (linear RGB)
    pub colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// Direction toward the light (world space)
    pub directions: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    /// x = shadow strength, y = first atlas tile
    pub shadow_data: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
}

impl GpuDirectionalLights {
    /// Size in bytes
    pub const SIZE: usize = core::mem::size_of::<Self>();

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Per-camera light setup, owning the shadow caster
#[derive(Debug)]
pub struct Lighting {
    buffer: CommandBuffer,
    shadows: Shadows,
    colors: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    directions: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    shadow_data: [Vec4; MAX_DIRECTIONAL_LIGHTS],
    light_count: usize,
}

impl Lighting {
    pub fn new() -> Self {
        Self {
            buffer: CommandBuffer::new(BUFFER_NAME),
            shadows: Shadows::new(),
            colors: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            directions: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            shadow_data: [Vec4::ZERO; MAX_DIRECTIONAL_LIGHTS],
            light_count: 0,
        }
    }

    /// Upload lights and render the shadow atlas for this camera
    pub fn setup(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
        shadow_settings: &ShadowSettings,
    ) {
        self.buffer.begin_sample(BUFFER_NAME);
        self.execute_buffer(ctx);

        self.shadows.setup(shadow_settings);
        self.setup_lights(&*ctx, culling);
        self.shadows.render(ctx, culling);

        self.buffer.set_global_int(ids::DIR_LIGHT_COUNT, self.light_count as i32);
        self.buffer.set_global_vector_array(ids::DIR_LIGHT_COLORS, &self.colors);
        self.buffer.set_global_vector_array(ids::DIR_LIGHT_DIRECTIONS, &self.directions);
        self.buffer.set_global_vector_array(ids::DIR_LIGHT_SHADOW_DATA, &self.shadow_data);
        self.buffer.end_sample(BUFFER_NAME);
        self.execute_buffer(ctx);
    }

    /// Release frame resources. Call after all geometry has been drawn,
    /// the shadow atlas stays bound until then.
    pub fn cleanup(&mut self, ctx: &mut dyn RenderContext) {
        self.shadows.cleanup(ctx);
    }

    fn setup_lights(&mut self, ctx: &dyn RenderContext, culling: &CullingResults) {
        self.light_count = 0;

        for (index, light) in culling.visible_lights.iter().enumerate() {
            if light.light_type != LightType::Directional {
                continue;
            }

            self.setup_directional_light(ctx, culling, light, index);
            if self.light_count >= MAX_DIRECTIONAL_LIGHTS {
                break;
            }
        }

        log::debug!(
            "{} directional lights, {} shadowed",
            self.light_count,
            self.shadows.shadowed_light_count()
        );
    }

    fn setup_directional_light(
        &mut self,
        ctx: &dyn RenderContext,
        culling: &CullingResults,
        light: &VisibleLight,
        visible_light_index: usize,
    ) {
        let slot = self.light_count;
        self.colors[slot] = light.final_color;
        self.directions[slot] = light.direction_to_light();

        let shadow = self
            .shadows
            .reserve_directional_shadows(ctx, culling, light, visible_light_index);
        self.shadow_data[slot] = shadow.extend(0.0).extend(0.0);

        self.light_count += 1;
    }

    fn execute_buffer(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_buffer(&self.buffer);
        self.buffer.clear();
    }

    /// Directional lights selected this frame
    pub fn light_count(&self) -> usize {
        self.light_count
    }

    /// Colors of the selected lights
    pub fn colors(&self) -> &[Vec4] {
        &self.colors[..self.light_count]
    }

    pub fn directions(&self) -> &[Vec4] {
        &self.directions[..self.light_count]
    }

    pub fn shadow_data(&self) -> &[Vec4] {
        &self.shadow_data[..self.light_count]
    }

    pub fn shadows(&self) -> &Shadows {
        &self.shadows
    }

    /// Uniform-buffer snapshot of the light globals
    pub fn uniforms(&self) -> GpuDirectionalLights {
        let mut uniforms = GpuDirectionalLights {
            count: self.light_count as i32,
            ..Default::default()
        };
        for slot in 0..self.light_count {
            uniforms.colors[slot] = self.colors[slot].to_array();
            uniforms.directions[slot] = self.directions[slot].to_array();
            uniforms.shadow_data[slot] = self.shadow_data[slot].to_array();
        }
        uniforms
    }
}

impl Default for Lighting {
    fn default() -> Self {
        Self::new()
    }
}
