//! Frame lifecycle tests for void_forward
//!
//! Drive the full pipeline against a scripted host across several frames and
//! check the invariants that hold between frames and cameras.

use std::collections::HashMap;

use glam::{Mat4, Vec3, Vec4};
use void_forward::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Host that tracks temporary targets and the shader globals it was given
#[derive(Default)]
struct ScriptedHost {
    visible_lights: Vec<VisibleLight>,
    degenerate: Vec<CameraId>,
    reversed_z: bool,

    live_targets: HashMap<&'static str, TemporaryTargetDesc>,
    peak_targets: usize,
    ints: HashMap<&'static str, i32>,
    vectors: HashMap<&'static str, Vec<Vec4>>,
    matrices: HashMap<&'static str, Vec<Mat4>>,
    bound_atlas: bool,
    draws_into_atlas: u32,
    shadow_draws: u32,
    submits: u32,
    sample_depth: i32,
}

impl ScriptedHost {
    fn with_lights(lights: Vec<VisibleLight>) -> Self {
        Self {
            visible_lights: lights,
            ..Default::default()
        }
    }
}

impl RenderContext for ScriptedHost {
    fn culling_parameters(&self, camera: &Camera) -> Option<CullingParameters> {
        if self.degenerate.contains(&camera.id) {
            None
        } else {
            Some(CullingParameters {
                camera: camera.id,
                shadow_distance: 0.0,
            })
        }
    }

    fn cull(&mut self, parameters: &CullingParameters) -> CullingResults {
        CullingResults {
            handle: parameters.camera,
            visible_lights: self.visible_lights.clone(),
        }
    }

    fn shadow_caster_bounds(&self, _culling: &CullingResults, _index: usize) -> Option<Bounds> {
        Some(Bounds {
            center: Vec3::ZERO,
            extents: Vec3::ONE,
        })
    }

    fn compute_directional_shadow_matrices(
        &self,
        _culling: &CullingResults,
        request: &CascadeRequest,
    ) -> DirectionalShadowMatrices {
        let radius = 10.0 * (request.cascade_index + 1) as f32;
        DirectionalShadowMatrices {
            view: Mat4::IDENTITY,
            projection: Mat4::orthographic_rh(-radius, radius, -radius, radius, 0.0, 2.0 * radius),
            split_data: ShadowSplitData {
                culling_sphere: Vec4::new(0.0, 0.0, radius, radius),
            },
        }
    }

    fn setup_camera_properties(&mut self, _camera: &Camera) {
        self.bound_atlas = false;
    }

    fn execute_command_buffer(&mut self, buffer: &CommandBuffer) {
        for command in buffer.commands() {
            match command {
                Command::BeginSample(_) => self.sample_depth += 1,
                Command::EndSample(_) => self.sample_depth -= 1,
                Command::GetTemporaryTarget { id, desc } => {
                    assert!(
                        self.live_targets.insert(id.name(), *desc).is_none(),
                        "{id} allocated twice"
                    );
                    self.peak_targets = self.peak_targets.max(self.live_targets.len());
                }
                Command::ReleaseTemporaryTarget(id) => {
                    assert!(self.live_targets.remove(id.name()).is_some(), "{id} released twice");
                }
                Command::SetRenderTarget { id, .. } => {
                    self.bound_atlas = *id == ids::DIR_SHADOW_ATLAS;
                }
                Command::SetGlobalInt(id, value) => {
                    self.ints.insert(id.name(), *value);
                }
                Command::SetGlobalVectorArray(id, values) => {
                    self.vectors.insert(id.name(), values.clone());
                }
                Command::SetGlobalMatrixArray(id, values) => {
                    self.matrices.insert(id.name(), values.clone());
                }
                _ => {}
            }
        }
    }

    fn draw_renderers(
        &mut self,
        _culling: &CullingResults,
        _drawing: &DrawingSettings,
        _filtering: &FilteringSettings,
    ) {
        if self.bound_atlas {
            self.draws_into_atlas += 1;
        }
    }

    fn draw_skybox(&mut self, _camera: &Camera) {}

    fn draw_shadows(&mut self, _settings: &ShadowDrawingSettings) {
        assert!(self.bound_atlas, "shadow casters drawn outside the atlas");
        self.shadow_draws += 1;
    }

    fn draw_gizmos(&mut self, _camera: &Camera, _subset: GizmoSubset) {}

    fn emit_scene_view_geometry(&mut self, _camera: &Camera) {}

    fn submit(&mut self) {
        assert_eq!(self.sample_depth, 0, "unbalanced profiling samples at submit");
        self.submits += 1;
    }

    fn uses_reversed_z(&self) -> bool {
        self.reversed_z
    }

    fn configure_graphics(&mut self, _settings: &GraphicsSettings) {}
}

fn shadowed_sun(strength: f32) -> VisibleLight {
    VisibleLight::directional(Vec3::new(0.3, -1.0, 0.4), Vec4::ONE)
        .with_shadows(LightShadows::Soft, strength)
}

fn settings(atlas_size: MapSize, cascade_count: u32) -> PipelineSettings {
    PipelineSettings {
        shadows: ShadowSettings {
            max_distance: 100.0,
            directional: DirectionalShadowSettings {
                atlas_size,
                cascade_count,
                ..Default::default()
            },
        },
        ..Default::default()
    }
}

/// INVARIANT: every allocated atlas is released within the same camera
#[test]
fn invariant_no_target_leaks_across_frames() {
    init_logging();
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0)]);
    let mut pipeline = ForwardPipeline::new(settings(MapSize::S2048, 4), &mut host);
    let cameras = [Camera::new(1, "Main Camera"), Camera::new(2, "Mirror")];

    for frame in 0..5 {
        if frame % 2 == 1 {
            host.visible_lights.clear();
        } else {
            host.visible_lights = vec![shadowed_sun(1.0)];
        }
        pipeline.render(&mut host, &cameras);
        assert!(host.live_targets.is_empty(), "frame {frame} leaked a target");
    }

    assert_eq!(host.peak_targets, 1);
    assert_eq!(host.submits, 10);
}

/// INVARIANT: geometry is never drawn into the shadow atlas
#[test]
fn invariant_geometry_drawn_to_camera_target() {
    init_logging();
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0), shadowed_sun(0.5)]);
    let mut pipeline = ForwardPipeline::new(settings(MapSize::S1024, 4), &mut host);

    pipeline.render(&mut host, &[Camera::new(1, "Main Camera")]);

    assert_eq!(host.shadow_draws, 8);
    assert_eq!(host.draws_into_atlas, 0);
}

/// INVARIANT: a frame's light globals do not depend on the previous frame
#[test]
fn invariant_frames_are_independent() {
    init_logging();
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0); 4]);
    let mut pipeline = ForwardPipeline::new(settings(MapSize::S1024, 2), &mut host);
    let camera = [Camera::new(1, "Main Camera")];

    let busy = pipeline.render(&mut host, &camera);
    assert_eq!(busy.cameras[0].shadows.shadowed_lights, 4);
    assert_eq!(host.ints["_DirectionalLightCount"], 4);

    host.visible_lights = vec![shadowed_sun(0.25)];
    let quiet = pipeline.render(&mut host, &camera);

    assert_eq!(quiet.cameras[0].directional_lights, 1);
    assert_eq!(quiet.cameras[0].shadows.shadowed_lights, 1);
    assert_eq!(quiet.cameras[0].shadows.tiles, 2);
    assert_eq!(host.ints["_DirectionalLightCount"], 1);
    assert_eq!(host.vectors["_DirectionalLightShadowData"][0], Vec4::new(0.25, 0.0, 0.0, 0.0));
}

#[test]
fn test_zero_lights_binds_placeholder() {
    init_logging();
    let mut host = ScriptedHost::default();
    let mut pipeline = ForwardPipeline::new(PipelineSettings::default(), &mut host);

    let frame = pipeline.render(&mut host, &[Camera::new(1, "Main Camera")]);

    assert_eq!(frame.cameras_rendered(), 1);
    assert_eq!(frame.shadow_draws(), 0);
    assert_eq!(host.shadow_draws, 0);
    assert_eq!(host.peak_targets, 1);
    assert_eq!(host.ints["_DirectionalLightCount"], 0);
    assert_eq!(host.ints["_CascadeCount"], 0);
    assert!(host.live_targets.is_empty());
}

#[test]
fn test_degenerate_camera_skipped() {
    init_logging();
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0)]);
    host.degenerate.push(7);
    let mut pipeline = ForwardPipeline::new(PipelineSettings::default(), &mut host);
    let cameras = [Camera::new(7, "Degenerate"), Camera::new(8, "Main Camera")];

    let frame = pipeline.render(&mut host, &cameras);

    assert_eq!(frame.cameras_requested, 2);
    assert_eq!(frame.cameras_skipped, 1);
    assert_eq!(frame.cameras[0].camera, 8);
    assert_eq!(host.submits, 1);
    assert!(host.live_targets.is_empty());
}

#[test]
fn test_culling_spheres_squared() {
    init_logging();
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0), shadowed_sun(1.0)]);
    let mut pipeline = ForwardPipeline::new(settings(MapSize::S4096, 3), &mut host);

    pipeline.render(&mut host, &[Camera::new(1, "Main Camera")]);

    let spheres = &host.vectors["_CascadeCullingSpheres"];
    assert_eq!(spheres.len(), 4);
    for cascade in 0..3 {
        let radius = 10.0 * (cascade + 1) as f32;
        assert_eq!(spheres[cascade], Vec4::new(0.0, 0.0, radius, radius * radius));
    }
    assert_eq!(host.ints["_CascadeCount"], 3);
}

#[test]
fn test_shadow_matrices_stay_in_their_tile() {
    init_logging();
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0); 3]);
    host.reversed_z = true;
    let mut pipeline = ForwardPipeline::new(settings(MapSize::S2048, 4), &mut host);

    pipeline.render(&mut host, &[Camera::new(1, "Main Camera")]);

    // 12 tiles in a 4x4 grid; each light's origin maps inside its own tile
    let matrices = &host.matrices["_DirectionalShadowMatrices"];
    for tile in 0..12usize {
        let p = matrices[tile] * Vec4::new(0.0, 0.0, -10.0, 1.0);
        let (column, row) = ((tile % 4) as f32, (tile / 4) as f32);
        assert!(p.x >= column / 4.0 && p.x <= (column + 1.0) / 4.0, "tile {tile} x = {}", p.x);
        assert!(p.y >= row / 4.0 && p.y <= (row + 1.0) / 4.0, "tile {tile} y = {}", p.y);
        assert!((0.0..=1.0).contains(&p.z), "tile {tile} z = {}", p.z);
    }
}

#[test]
fn test_settings_from_json() {
    init_logging();
    let json = r#"{
        "use_dynamic_batching": false,
        "shadows": {
            "max_distance": 60.0,
            "directional": { "atlas_size": 512, "cascade_count": 2 }
        }
    }"#;
    let mut host = ScriptedHost::with_lights(vec![shadowed_sun(1.0)]);

    let mut pipeline = ForwardPipeline::from_json(json, &mut host).unwrap();
    let frame = pipeline.render(&mut host, &[Camera::new(1, "Main Camera")]);

    assert!(!pipeline.settings().use_dynamic_batching);
    assert_eq!(frame.cameras[0].shadows.tiles, 2);
    assert_eq!(host.shadow_draws, 2);
}
