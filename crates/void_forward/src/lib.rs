//! # void_forward - Forward Pipeline with Cascaded Directional Shadows
//!
//! A per-camera forward render pipeline driven by a host engine:
//! - Culling with a camera-clamped shadow distance
//! - Up to 4 directional lights uploaded as shader globals
//! - Cascaded shadow maps for up to 4 lights in one square atlas
//! - Opaque, skybox and transparent draws with configurable batching
//! - Optional editor passes (unsupported shaders, gizmos)
//!
//! ## Architecture
//!
//! The pipeline never touches the GPU directly:
//!
//! 1. **Host**: the engine implements [`RenderContext`] (culling, draw
//!    submission, command execution)
//! 2. **Commands**: state changes and shader globals are recorded into a
//!    [`CommandBuffer`] and handed to the host
//! 3. **Renderers**: [`CameraRenderer`] runs the per-camera phases, with
//!    [`Lighting`] and [`Shadows`] owning the light and atlas state
//!
//! ## Example
//!
//! ```ignore
//! use void_forward::prelude::*;
//!
//! let settings = PipelineSettings::from_json(&std::fs::read_to_string("pipeline.json")?)?;
//! let mut pipeline = ForwardPipeline::new(settings, &mut host);
//!
//! // Each frame
//! let cameras = [Camera::new(1, "Main Camera")];
//! let stats = pipeline.render(&mut host, &cameras);
//! log::debug!("{} shadow draws", stats.shadow_draws());
//! ```

pub mod camera;
pub mod command;
pub mod draw;
pub mod error;
pub mod host;
pub mod lighting;
pub mod pipeline;
pub mod resource;
pub mod settings;
pub mod shadow;
pub mod stats;

#[cfg(test)]
mod testing;

pub use camera::{CameraRenderer, RenderPhase};
pub use command::{Command, CommandBuffer};
pub use error::{ConfigError, Result};
pub use host::RenderContext;
pub use lighting::{GpuDirectionalLights, Lighting, MAX_DIRECTIONAL_LIGHTS};
pub use pipeline::ForwardPipeline;
pub use settings::{
    DirectionalShadowSettings, MapSize, PipelineSettings, ShadowQuality, ShadowSettings,
};
pub use shadow::Shadows;
pub use stats::{CameraStats, FrameStats};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::camera::CameraRenderer;
    pub use crate::command::{Command, CommandBuffer};
    pub use crate::draw::{
        tags, DrawingSettings, FilteringSettings, OverrideMaterial, RenderQueueRange,
        ShaderTagId, ShadowDrawingSettings, SortingCriteria,
    };
    pub use crate::error::{ConfigError, Result};
    pub use crate::host::{
        Bounds, Camera, CameraId, CameraType, CascadeRequest, ClearFlags, CullingParameters,
        CullingResults, DirectionalShadowMatrices, GizmoSubset, GraphicsSettings, LightShadows,
        LightType, RenderContext, ShadowSplitData, VisibleLight,
    };
    pub use crate::lighting::Lighting;
    pub use crate::pipeline::ForwardPipeline;
    pub use crate::resource::{ids, Rect, ShaderProperty, TemporaryTargetDesc};
    pub use crate::settings::{
        DirectionalShadowSettings, MapSize, PipelineSettings, ShadowQuality, ShadowSettings,
    };
    pub use crate::shadow::{AtlasTarget, Shadows};
    pub use crate::stats::{CameraStats, FrameStats};
}
