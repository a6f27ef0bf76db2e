//! Recording host for unit tests
//!
//! Implements [`RenderContext`] by remembering every call, so tests can
//! assert on ordering, draw counts and published globals.

use std::cell::RefCell;
use std::collections::HashSet;

use glam::{Mat4, Vec3, Vec4};

use crate::command::{Command, CommandBuffer};
use crate::draw::{DrawingSettings, FilteringSettings, ShadowDrawingSettings};
use crate::host::{
    Bounds, Camera, CameraId, CascadeRequest, CullingParameters, CullingResults,
    DirectionalShadowMatrices, GizmoSubset, GraphicsSettings, RenderContext, ShadowSplitData,
    VisibleLight,
};
use crate::resource::{Rect, ShaderProperty, TemporaryTargetDesc};

/// Host call, in the order it happened
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    SceneViewGeometry,
    Cull,
    SetupCamera,
    /// Buffer name of an executed command buffer
    Execute(String),
    DrawRenderers,
    DrawSkybox,
    DrawShadows,
    DrawGizmos(GizmoSubset),
    Submit,
}

pub struct RecordingContext {
    pub events: Vec<HostEvent>,
    pub commands: Vec<Command>,
    pub culls: Vec<CullingParameters>,
    pub renderer_draws: Vec<(DrawingSettings, FilteringSettings)>,
    pub shadow_draws: Vec<ShadowDrawingSettings>,
    pub cascade_requests: RefCell<Vec<CascadeRequest>>,
    pub graphics: Option<GraphicsSettings>,

    /// Lights returned from `cull`
    pub visible_lights: Vec<VisibleLight>,
    /// Cameras that fail to produce culling parameters
    pub invalid_cameras: HashSet<CameraId>,
    /// Visible light indices reported without shadow casters
    pub lights_without_casters: HashSet<usize>,
    /// Culling sphere returned for a cascade request
    pub sphere_for: fn(&CascadeRequest) -> Vec4,
    pub reversed_z: bool,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            commands: Vec::new(),
            culls: Vec::new(),
            renderer_draws: Vec::new(),
            shadow_draws: Vec::new(),
            cascade_requests: RefCell::new(Vec::new()),
            graphics: None,
            visible_lights: Vec::new(),
            invalid_cameras: HashSet::new(),
            lights_without_casters: HashSet::new(),
            sphere_for: |request| Vec4::new(0.0, 0.0, request.cascade_index as f32 * 10.0, 5.0),
            reversed_z: false,
        }
    }

    pub fn viewports(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetViewport(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn allocated_targets(&self) -> Vec<TemporaryTargetDesc> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::GetTemporaryTarget { desc, .. } => Some(*desc),
                _ => None,
            })
            .collect()
    }

    pub fn released_targets(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::ReleaseTemporaryTarget(_)))
            .count()
    }

    /// Last value published for an int global
    pub fn global_int(&self, id: ShaderProperty) -> Option<i32> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetGlobalInt(name, value) if *name == id => Some(*value),
            _ => None,
        })
    }

    pub fn global_float(&self, id: ShaderProperty) -> Option<f32> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetGlobalFloat(name, value) if *name == id => Some(*value),
            _ => None,
        })
    }

    pub fn global_vectors(&self, id: ShaderProperty) -> Option<Vec<Vec4>> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetGlobalVectorArray(name, values) if *name == id => Some(values.clone()),
            _ => None,
        })
    }

    pub fn global_matrices(&self, id: ShaderProperty) -> Option<Vec<Mat4>> {
        self.commands.iter().rev().find_map(|c| match c {
            Command::SetGlobalMatrixArray(name, values) if *name == id => Some(values.clone()),
            _ => None,
        })
    }

    pub fn count(&self, event: &HostEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl RenderContext for RecordingContext {
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        if self.invalid_cameras.contains(&camera.id) {
            return None;
        }
        Some(CullingParameters {
            camera: camera.id,
            shadow_distance: 0.0,
        })
    }

    fn cull(&mut self, parameters: &CullingParameters) -> CullingResults {
        self.events.push(HostEvent::Cull);
        self.culls.push(*parameters);
        CullingResults {
            handle: parameters.camera,
            visible_lights: self.visible_lights.clone(),
        }
    }

    fn shadow_caster_bounds(
        &self,
        _culling: &CullingResults,
        visible_light_index: usize,
    ) -> Option<Bounds> {
        if self.lights_without_casters.contains(&visible_light_index) {
            None
        } else {
            Some(Bounds {
                center: Vec3::ZERO,
                extents: Vec3::splat(10.0),
            })
        }
    }

    fn compute_directional_shadow_matrices(
        &self,
        _culling: &CullingResults,
        request: &CascadeRequest,
    ) -> DirectionalShadowMatrices {
        self.cascade_requests.borrow_mut().push(*request);
        DirectionalShadowMatrices {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            split_data: ShadowSplitData {
                culling_sphere: (self.sphere_for)(request),
            },
        }
    }

    fn setup_camera_properties(&mut self, _camera: &Camera) {
        self.events.push(HostEvent::SetupCamera);
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        self.events.push(HostEvent::Execute(buffer.name().to_string()));
        self.commands.extend(buffer.commands().iter().cloned());
    }

    fn draw_renderers(
        &mut self,
        _culling: &CullingResults,
        drawing: &DrawingSettings,
        filtering: &FilteringSettings,
    ) {
        self.events.push(HostEvent::DrawRenderers);
        self.renderer_draws.push((drawing.clone(), *filtering));
    }

    fn draw_skybox(&mut self, _camera: &Camera) {
        self.events.push(HostEvent::DrawSkybox);
    }

    fn draw_shadows(&mut self, settings: &ShadowDrawingSettings) {
        self.events.push(HostEvent::DrawShadows);
        self.shadow_draws.push(*settings);
    }

    fn draw_gizmos(&mut self, _camera: &Camera, subset: GizmoSubset) {
        self.events.push(HostEvent::DrawGizmos(subset));
    }

    fn emit_scene_view_geometry(&mut self, _camera: &Camera) {
        self.events.push(HostEvent::SceneViewGeometry);
    }

    fn submit(&mut self) {
        self.events.push(HostEvent::Submit);
    }

    fn uses_reversed_z(&self) -> bool {
        self.reversed_z
    }

    fn configure_graphics(&mut self, settings: &GraphicsSettings) {
        self.graphics = Some(*settings);
    }
}
