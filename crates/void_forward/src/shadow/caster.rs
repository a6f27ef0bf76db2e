//! Directional Shadow Caster
//!
//! Reserves atlas tiles for shadowed directional lights, renders their
//! cascades into the atlas and publishes the shadow globals.
//!
//! The atlas is a temporary target: [`Shadows::render`] allocates it (or a
//! 1x1 placeholder when nothing is shadowed) and [`Shadows::cleanup`] must
//! release it once the frame's geometry has been drawn.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

use super::atlas::{atlas_matrix, AtlasLayout, AtlasTarget, ShadowAtlasState};
use super::data::GpuShadowUniforms;
use super::MAX_SHADOWED_DIRECTIONAL_LIGHTS;
use crate::command::CommandBuffer;
use crate::draw::ShadowDrawingSettings;
use crate::host::{CascadeRequest, CullingResults, LightShadows, RenderContext, VisibleLight};
use crate::resource::{ids, LoadAction, StoreAction, TemporaryTargetDesc};
use crate::settings::ShadowSettings;

const BUFFER_NAME: &str = "Shadows";

/// A directional light that passed reservation this frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowedDirectionalLight {
    /// Index into the culling results' visible lights
    pub visible_light_index: usize,
}

/// Shadow statistics for the last rendered frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowStats {
    /// Lights that passed reservation
    pub shadowed_lights: u32,
    /// Atlas tiles rendered
    pub tiles: u32,
    /// Shadow caster draws issued
    pub draw_calls: u32,
}

/// Directional shadow atlas allocator and renderer
#[derive(Debug)]
pub struct Shadows {
    buffer: CommandBuffer,
    settings: ShadowSettings,
    lights: [ShadowedDirectionalLight; MAX_SHADOWED_DIRECTIONAL_LIGHTS],
    light_count: usize,
    state: ShadowAtlasState,
    target: AtlasTarget,
    stats: ShadowStats,
}

impl Shadows {
    pub fn new() -> Self {
        Self {
            buffer: CommandBuffer::new(BUFFER_NAME),
            settings: ShadowSettings::default(),
            lights: [ShadowedDirectionalLight::default(); MAX_SHADOWED_DIRECTIONAL_LIGHTS],
            light_count: 0,
            state: ShadowAtlasState::default(),
            target: AtlasTarget::Released,
            stats: ShadowStats::default(),
        }
    }

    /// Begin a frame: forget last frame's reservations
    pub fn setup(&mut self, settings: &ShadowSettings) {
        if self.target.is_allocated() {
            log::warn!("Shadow target {:?} still allocated at setup", self.target);
        }
        // Tile and sphere arrays are sized for the clamped cascade count
        self.settings = settings.clone();
        self.settings.sanitize();
        self.light_count = 0;
        self.stats = ShadowStats::default();
    }

    /// Reserve atlas tiles for a light
    ///
    /// Returns `(shadow strength, first tile index)`, or zero when the light
    /// will not be shadowed. A zero vector means "unshadowed" to shaders.
    pub fn reserve_directional_shadows(
        &mut self,
        ctx: &dyn RenderContext,
        culling: &CullingResults,
        light: &VisibleLight,
        visible_light_index: usize,
    ) -> Vec2 {
        if self.light_count >= MAX_SHADOWED_DIRECTIONAL_LIGHTS {
            log::debug!("Light {visible_light_index} not shadowed: shadowed light limit reached");
            return Vec2::ZERO;
        }
        let strength = light.shadow_strength;
        if light.shadows == LightShadows::None || strength.is_nan() || strength <= 0.0 {
            log::debug!("Light {visible_light_index} not shadowed: shadows disabled");
            return Vec2::ZERO;
        }
        if ctx.shadow_caster_bounds(culling, visible_light_index).is_none() {
            log::debug!("Light {visible_light_index} not shadowed: no visible casters");
            return Vec2::ZERO;
        }

        let slot = self.light_count;
        self.lights[slot] = ShadowedDirectionalLight { visible_light_index };
        self.light_count += 1;

        let first_tile = slot as u32 * self.settings.directional.cascade_count;
        Vec2::new(light.shadow_strength, first_tile as f32)
    }

    /// Render the atlas, or bind a placeholder when nothing is shadowed
    pub fn render(&mut self, ctx: &mut dyn RenderContext, culling: &CullingResults) {
        if self.light_count > 0 {
            self.render_directional_shadows(ctx, culling);
        } else {
            self.render_placeholder(ctx);
        }
    }

    /// Release the atlas target. Call once per frame after all geometry.
    pub fn cleanup(&mut self, ctx: &mut dyn RenderContext) {
        if !self.target.is_allocated() {
            log::warn!("Shadow cleanup without an allocated target");
            return;
        }

        self.buffer.release_temporary_target(ids::DIR_SHADOW_ATLAS);
        self.execute_buffer(ctx);
        self.target = AtlasTarget::Released;
    }

    fn render_placeholder(&mut self, ctx: &mut dyn RenderContext) {
        // Shaders always sample the atlas, so something must be bound
        self.allocate_target(AtlasTarget::Dummy);
        self.state.layout = None;

        self.buffer.begin_sample(BUFFER_NAME);
        self.publish_globals(0);
        self.buffer.end_sample(BUFFER_NAME);
        self.execute_buffer(ctx);
    }

    fn render_directional_shadows(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
    ) {
        let atlas_size = self.settings.directional.atlas_size.pixels();
        self.allocate_target(AtlasTarget::Atlas { size: atlas_size });
        self.buffer
            .set_render_target(ids::DIR_SHADOW_ATLAS, LoadAction::DontCare, StoreAction::Store);
        self.buffer.clear_render_target(true, false, Vec4::ZERO);
        self.buffer.begin_sample(BUFFER_NAME);
        self.execute_buffer(ctx);

        let cascade_count = self.settings.directional.cascade_count;
        let layout = AtlasLayout::new(atlas_size, self.light_count as u32 * cascade_count);
        log::debug!(
            "Shadow atlas: {} tiles, split {}, tile size {}",
            layout.tile_count,
            layout.split,
            layout.tile_size
        );

        for index in 0..self.light_count {
            self.render_light(ctx, culling, index, &layout);
        }

        self.state.layout = Some(layout);
        self.stats.shadowed_lights = self.light_count as u32;
        self.stats.tiles = layout.tile_count;

        self.publish_globals(cascade_count);
        self.buffer.end_sample(BUFFER_NAME);
        self.execute_buffer(ctx);
    }

    fn render_light(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
        index: usize,
        layout: &AtlasLayout,
    ) {
        let light = self.lights[index];
        let cascade_count = self.settings.directional.cascade_count;
        let tile_offset = index as u32 * cascade_count;
        let ratios = self.settings.directional.cascade_ratios();
        let reversed_z = ctx.uses_reversed_z();

        for cascade in 0..cascade_count {
            let request = CascadeRequest {
                visible_light_index: light.visible_light_index,
                cascade_index: cascade,
                cascade_count,
                ratios,
                resolution: layout.tile_size,
                near_plane_offset: 0.0,
            };
            let matrices = ctx.compute_directional_shadow_matrices(culling, &request);

            // Cascades are identical for every light sharing the camera frustum
            if index == 0 {
                self.state
                    .record_culling_sphere(cascade as usize, matrices.split_data.culling_sphere);
            }

            let tile_index = tile_offset + cascade;
            self.buffer.set_viewport(layout.tile_viewport(tile_index));
            self.state.matrices[tile_index as usize] = atlas_matrix(
                matrices.projection * matrices.view,
                layout.tile_offset(tile_index),
                layout.split,
                reversed_z,
            );

            self.buffer.set_view_projection(matrices.view, matrices.projection);
            self.execute_buffer(ctx);

            ctx.draw_shadows(&ShadowDrawingSettings {
                visible_light_index: light.visible_light_index,
                split_data: matrices.split_data,
            });
            self.stats.draw_calls += 1;
        }
    }

    fn publish_globals(&mut self, cascade_count: u32) {
        self.buffer.set_global_int(ids::CASCADE_COUNT, cascade_count as i32);
        self.buffer.set_global_vector_array(
            ids::CASCADE_CULLING_SPHERES,
            &self.state.cascade_culling_spheres,
        );
        self.buffer
            .set_global_matrix_array(ids::DIR_SHADOW_MATRICES, &self.state.matrices);
        self.buffer.set_global_float(ids::SHADOW_DISTANCE, self.settings.max_distance);
    }

    fn allocate_target(&mut self, target: AtlasTarget) {
        debug_assert!(!self.target.is_allocated(), "shadow target allocated twice");
        let size = target.size().unwrap_or(1);
        self.buffer
            .get_temporary_target(ids::DIR_SHADOW_ATLAS, TemporaryTargetDesc::shadow_map(size));
        self.target = target;
    }

    fn execute_buffer(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_buffer(&self.buffer);
        self.buffer.clear();
    }

    /// Lights reserved this frame
    pub fn shadowed_lights(&self) -> &[ShadowedDirectionalLight] {
        &self.lights[..self.light_count]
    }

    pub fn shadowed_light_count(&self) -> usize {
        self.light_count
    }

    /// Current atlas target
    pub fn target(&self) -> AtlasTarget {
        self.target
    }

    /// Shadow globals as last rendered
    pub fn state(&self) -> &ShadowAtlasState {
        &self.state
    }

    /// Uniform-buffer snapshot of the shadow globals
    pub fn uniforms(&self) -> GpuShadowUniforms {
        let cascade_count = if self.light_count > 0 {
            self.settings.directional.cascade_count
        } else {
            0
        };
        GpuShadowUniforms::from_state(&self.state, cascade_count, self.settings.max_distance)
    }

    pub fn stats(&self) -> ShadowStats {
        self.stats
    }
}

impl Default for Shadows {
    fn default() -> Self {
        Self::new()
    }
}
