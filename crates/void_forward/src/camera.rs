//! Camera Renderer
//!
//! Renders one camera per call as a fixed sequence of phases. The only early
//! exit is a failed cull, which skips the camera for this frame.
//!
//! # Phases
//!
//! 1. **Cull**: derive culling parameters and cull with the clamped shadow
//!    distance
//! 2. **Lighting**: upload directional lights and render the shadow atlas
//! 3. **Setup**: bind the camera target and clear it
//! 4. **Draw**: opaque, skybox, transparent
//! 5. **Editor**: unsupported shaders and gizmos (optional)
//! 6. **Cleanup**: release the shadow atlas
//! 7. **Submit**: flush and schedule GPU work
//!
//! Lighting runs before Setup because rendering the atlas rebinds the active
//! render target; Setup then restores the camera target before any geometry
//! is drawn.

use crate::command::CommandBuffer;
use crate::draw::{
    tags, DrawingSettings, FilteringSettings, OverrideMaterial, RenderQueueRange, SortingCriteria,
};
use crate::host::{Camera, CameraType, CullingResults, GizmoSubset, RenderContext};
use crate::lighting::Lighting;
use crate::settings::PipelineSettings;
use crate::stats::CameraStats;

const DEFAULT_BUFFER_NAME: &str = "Render Camera";

/// Per-camera render phase, in execution order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderPhase {
    Idle,
    Cull,
    Lighting,
    Setup,
    Draw,
    Editor,
    Cleanup,
    Submit,
}

/// Renders cameras one at a time, reusing its buffers across cameras
#[derive(Debug)]
pub struct CameraRenderer {
    buffer: CommandBuffer,
    lighting: Lighting,
    phase: RenderPhase,
}

impl CameraRenderer {
    pub fn new() -> Self {
        Self {
            buffer: CommandBuffer::new(DEFAULT_BUFFER_NAME),
            lighting: Lighting::new(),
            phase: RenderPhase::Idle,
        }
    }

    /// Render one camera
    ///
    /// Returns `None` if the camera could not be culled; nothing is drawn or
    /// allocated in that case.
    pub fn render(
        &mut self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        settings: &PipelineSettings,
    ) -> Option<CameraStats> {
        self.phase = RenderPhase::Idle;
        self.prepare_buffer(camera);
        if settings.editor_passes {
            self.prepare_for_scene_window(ctx, camera);
        }

        let culling = match self.cull(ctx, camera, settings.shadows.max_distance) {
            Some(culling) => culling,
            None => {
                log::warn!("Camera '{}' has no valid culling parameters, skipping", camera.name);
                self.phase = RenderPhase::Idle;
                return None;
            }
        };

        self.enter(RenderPhase::Lighting);
        self.buffer.begin_sample(camera.name.as_str());
        self.execute_buffer(ctx);
        self.lighting.setup(ctx, &culling, &settings.shadows);
        self.buffer.end_sample(camera.name.as_str());

        self.setup(ctx, camera);

        self.enter(RenderPhase::Draw);
        let mut renderer_draws = self.draw_visible_geometry(ctx, camera, &culling, settings);

        if settings.editor_passes {
            self.enter(RenderPhase::Editor);
            renderer_draws += self.draw_unsupported_shaders(ctx, &culling);
            self.draw_gizmos(ctx, camera);
        }

        self.enter(RenderPhase::Cleanup);
        self.lighting.cleanup(ctx);

        self.submit(ctx, camera);

        let stats = CameraStats {
            camera: camera.id,
            visible_lights: culling.visible_lights.len() as u32,
            directional_lights: self.lighting.light_count() as u32,
            renderer_draws,
            shadows: self.lighting.shadows().stats(),
        };
        self.phase = RenderPhase::Idle;
        Some(stats)
    }

    fn enter(&mut self, phase: RenderPhase) {
        debug_assert!(
            phase > self.phase,
            "render phase {:?} entered after {:?}",
            phase,
            self.phase
        );
        log::debug!("Render phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn prepare_buffer(&mut self, camera: &Camera) {
        self.buffer.set_name(camera.name.as_str());
    }

    fn prepare_for_scene_window(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        if camera.camera_type == CameraType::SceneView {
            ctx.emit_scene_view_geometry(camera);
        }
    }

    fn cull(
        &mut self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        max_shadow_distance: f32,
    ) -> Option<CullingResults> {
        self.enter(RenderPhase::Cull);
        let mut parameters = ctx.culling_parameters(camera)?;
        parameters.shadow_distance = max_shadow_distance.min(camera.far_clip_plane);
        Some(ctx.cull(&parameters))
    }

    fn setup(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        self.enter(RenderPhase::Setup);
        ctx.setup_camera_properties(camera);
        let flags = camera.clear_flags;
        self.buffer
            .clear_render_target(flags.clears_depth(), flags.clears_color(), camera.clear_color());
        self.buffer.begin_sample(camera.name.as_str());
        self.execute_buffer(ctx);
    }

    fn draw_visible_geometry(
        &mut self,
        ctx: &mut dyn RenderContext,
        camera: &Camera,
        culling: &CullingResults,
        settings: &PipelineSettings,
    ) -> u32 {
        let mut drawing = DrawingSettings::new(tags::DEFAULT_UNLIT, SortingCriteria::CommonOpaque);
        drawing.set_shader_pass(1, tags::LIT);
        drawing.enable_dynamic_batching = settings.use_dynamic_batching;
        drawing.enable_instancing = settings.use_gpu_instancing;

        ctx.draw_renderers(culling, &drawing, &FilteringSettings::new(RenderQueueRange::OPAQUE));

        ctx.draw_skybox(camera);

        drawing.sorting = SortingCriteria::CommonTransparent;
        let transparent = FilteringSettings::new(RenderQueueRange::TRANSPARENT);
        ctx.draw_renderers(culling, &drawing, &transparent);

        2
    }

    fn draw_unsupported_shaders(
        &mut self,
        ctx: &mut dyn RenderContext,
        culling: &CullingResults,
    ) -> u32 {
        let mut drawing = DrawingSettings::new(tags::LEGACY[0], SortingCriteria::default());
        for (index, tag) in tags::LEGACY.iter().enumerate().skip(1) {
            drawing.set_shader_pass(index, *tag);
        }
        drawing.override_material = Some(OverrideMaterial::Error);

        ctx.draw_renderers(culling, &drawing, &FilteringSettings::default());
        1
    }

    fn draw_gizmos(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        if camera.gizmos {
            ctx.draw_gizmos(camera, GizmoSubset::PreImageEffects);
            ctx.draw_gizmos(camera, GizmoSubset::PostImageEffects);
        }
    }

    fn submit(&mut self, ctx: &mut dyn RenderContext, camera: &Camera) {
        self.enter(RenderPhase::Submit);
        self.buffer.end_sample(camera.name.as_str());
        self.execute_buffer(ctx);
        ctx.submit();
    }

    fn execute_buffer(&mut self, ctx: &mut dyn RenderContext) {
        ctx.execute_command_buffer(&self.buffer);
        self.buffer.clear();
    }

    /// Phase the renderer is in (`Idle` between cameras)
    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    /// Light state of the last rendered camera
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }
}

impl Default for CameraRenderer {
    fn default() -> Self {
        Self::new()
    }
}
