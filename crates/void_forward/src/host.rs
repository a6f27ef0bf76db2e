//! Host Interface
//!
//! The pipeline does not cull, rasterize or own GPU memory. The engine that
//! embeds it implements [`RenderContext`] and supplies those services; the
//! pipeline only decides what to ask for and in which order.
//!
//! The trait is object safe and the pipeline only ever holds a
//! `&mut dyn RenderContext`.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::command::CommandBuffer;
use crate::draw::{DrawingSettings, FilteringSettings, ShadowDrawingSettings};

/// Services the host engine provides to the pipeline
pub trait RenderContext {
    // === Culling ===

    /// Derive culling parameters from a camera, or `None` if the camera
    /// cannot be culled (degenerate projection, zero-size viewport, ...)
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters>;

    /// Cull the scene
    fn cull(&mut self, parameters: &CullingParameters) -> CullingResults;

    /// Bounds of the visible shadow casters of a light, or `None` if the
    /// light casts no visible shadows
    fn shadow_caster_bounds(
        &self,
        culling: &CullingResults,
        visible_light_index: usize,
    ) -> Option<Bounds>;

    /// Compute view/projection matrices and the culling split for one
    /// directional light cascade
    fn compute_directional_shadow_matrices(
        &self,
        culling: &CullingResults,
        request: &CascadeRequest,
    ) -> DirectionalShadowMatrices;

    // === State & commands ===

    /// Bind the camera's target and upload its view/projection globals
    fn setup_camera_properties(&mut self, camera: &Camera);

    /// Queue the buffer's commands. The buffer is left for the caller to clear.
    fn execute_command_buffer(&mut self, buffer: &CommandBuffer);

    // === Drawing ===

    fn draw_renderers(
        &mut self,
        culling: &CullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    );

    fn draw_skybox(&mut self, camera: &Camera);

    fn draw_shadows(&mut self, settings: &ShadowDrawingSettings);

    fn draw_gizmos(&mut self, camera: &Camera, subset: GizmoSubset);

    /// Emit UI geometry into the scene view before it is culled
    fn emit_scene_view_geometry(&mut self, camera: &Camera);

    // === Frame ===

    /// Schedule all queued work on the GPU
    fn submit(&mut self);

    /// Whether depth is reversed (1 near, 0 far)
    fn uses_reversed_z(&self) -> bool;

    /// Apply global graphics settings once at pipeline creation
    fn configure_graphics(&mut self, settings: &GraphicsSettings);
}

/// Global graphics settings applied by the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsSettings {
    pub use_srp_batcher: bool,
    /// Light colors are multiplied by intensity in linear space
    pub lights_use_linear_intensity: bool,
}

/// Identifier the host uses for a camera
pub type CameraId = u64;

/// Camera category
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraType {
    #[default]
    Game,
    SceneView,
    Preview,
    Reflection,
}

/// How a camera clears its target, ordered from most to least clearing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClearFlags {
    #[default]
    Skybox,
    Color,
    Depth,
    Nothing,
}

impl ClearFlags {
    /// Depth is cleared for every mode but `Nothing`
    pub fn clears_depth(self) -> bool {
        self <= Self::Depth
    }

    pub fn clears_color(self) -> bool {
        self == Self::Color
    }
}

/// A camera to render
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: String,
    pub camera_type: CameraType,
    pub clear_flags: ClearFlags,
    /// Background color in linear space
    pub background_color: Vec4,
    pub far_clip_plane: f32,
    /// Whether gizmos should be drawn for this camera
    pub gizmos: bool,
}

impl Camera {
    pub fn new(id: CameraId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            camera_type: CameraType::Game,
            clear_flags: ClearFlags::Skybox,
            background_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
            far_clip_plane: 1000.0,
            gizmos: false,
        }
    }

    pub fn with_type(mut self, camera_type: CameraType) -> Self {
        self.camera_type = camera_type;
        self
    }

    pub fn with_clear_flags(mut self, flags: ClearFlags, background_color: Vec4) -> Self {
        self.clear_flags = flags;
        self.background_color = background_color;
        self
    }

    pub fn with_far_clip_plane(mut self, far: f32) -> Self {
        self.far_clip_plane = far;
        self
    }

    pub fn with_gizmos(mut self, gizmos: bool) -> Self {
        self.gizmos = gizmos;
        self
    }

    /// Clear color for the camera's clear flags
    pub fn clear_color(&self) -> Vec4 {
        if self.clear_flags.clears_color() {
            self.background_color
        } else {
            Vec4::ZERO
        }
    }
}

/// Culling parameters derived from a camera
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CullingParameters {
    pub camera: CameraId,
    /// Shadow casters beyond this distance are culled
    pub shadow_distance: f32,
}

/// Host culling output for one camera
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CullingResults {
    /// Host handle for this culling pass
    pub handle: u64,
    pub visible_lights: Vec<VisibleLight>,
}

/// Light type as reported by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    Directional,
    Point,
    Spot,
    Area,
}

/// Per-light shadow mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightShadows {
    #[default]
    None,
    Hard,
    Soft,
}

/// A light that survived culling
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisibleLight {
    pub light_type: LightType,
    /// Color already scaled by intensity
    pub final_color: Vec4,
    pub local_to_world: Mat4,
    pub shadows: LightShadows,
    /// Shadow darkness (0 = no shadow, 1 = full shadow)
    pub shadow_strength: f32,
}

impl VisibleLight {
    /// Unshadowed directional light pointing along `forward`
    pub fn directional(forward: Vec3, final_color: Vec4) -> Self {
        let forward = forward.normalize_or_zero();
        let up = if forward.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        let right = up.cross(forward).normalize_or_zero();
        let up = forward.cross(right);

        Self {
            light_type: LightType::Directional,
            final_color,
            local_to_world: Mat4::from_cols(
                right.extend(0.0),
                up.extend(0.0),
                forward.extend(0.0),
                Vec4::W,
            ),
            shadows: LightShadows::None,
            shadow_strength: 1.0,
        }
    }

    /// Set shadow mode and strength
    pub fn with_shadows(mut self, shadows: LightShadows, strength: f32) -> Self {
        self.shadows = shadows;
        self.shadow_strength = strength;
        self
    }

    /// Unit vector from the surface toward the light
    pub fn direction_to_light(&self) -> Vec4 {
        -self.local_to_world.z_axis
    }
}

/// Axis-aligned bounds
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

/// Request for one directional cascade's matrices
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeRequest {
    pub visible_light_index: usize,
    pub cascade_index: u32,
    pub cascade_count: u32,
    /// Cascade split ratios
    pub ratios: Vec3,
    /// Tile resolution in pixels
    pub resolution: u32,
    pub near_plane_offset: f32,
}

/// How shadow casters are culled for one cascade
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShadowSplitData {
    /// xyz = center, w = radius
    pub culling_sphere: Vec4,
}

/// Output of cascade matrix computation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalShadowMatrices {
    pub view: Mat4,
    pub projection: Mat4,
    pub split_data: ShadowSplitData,
}

/// Gizmo drawing stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GizmoSubset {
    PreImageEffects,
    PostImageEffects,
}
