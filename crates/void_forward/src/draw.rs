//! Draw Settings
//!
//! Descriptions of the draw batches handed to the host: which shader passes
//! an object may render with, how visible objects are sorted and which
//! render-queue range is drawn.
//!
//! # Pass priority
//!
//! [`DrawingSettings`] holds up to [`MAX_SHADER_PASSES`] shader tags. Slot 0
//! is tried first for each object, then slot 1, and so on; the first pass an
//! object's shader provides is the one drawn.

use serde::{Deserialize, Serialize};

use crate::host::ShadowSplitData;

/// Maximum shader pass slots per draw
pub const MAX_SHADER_PASSES: usize = 16;

/// Shader pass tag identifying which passes a draw may use
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderTagId(&'static str);

impl ShaderTagId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Built-in pass tags
pub mod tags {
    use super::ShaderTagId;

    /// Unlit pass every pipeline shader provides
    pub const DEFAULT_UNLIT: ShaderTagId = ShaderTagId::new("SRPDefaultUnlit");
    /// Lit pass evaluated against the directional lights
    pub const LIT: ShaderTagId = ShaderTagId::new("CustomLit");

    /// Passes from the host's legacy built-in pipeline, which this pipeline
    /// cannot shade
    pub const LEGACY: [ShaderTagId; 6] = [
        ShaderTagId::new("Always"),
        ShaderTagId::new("ForwardBase"),
        ShaderTagId::new("PrepassBase"),
        ShaderTagId::new("Vertex"),
        ShaderTagId::new("VertexLMRGBM"),
        ShaderTagId::new("VertexLM"),
    ];
}

/// Object sort order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortingCriteria {
    /// No sorting
    #[default]
    None,
    /// Typical opaque order: roughly front-to-back, grouped by material
    CommonOpaque,
    /// Typical transparent order: back-to-front
    CommonTransparent,
}

/// Render queue range filter (inclusive)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderQueueRange {
    pub lower: u32,
    pub upper: u32,
}

impl RenderQueueRange {
    /// Geometry, alpha-test and opaque queues
    pub const OPAQUE: Self = Self { lower: 0, upper: 2500 };
    /// Transparent and overlay queues
    pub const TRANSPARENT: Self = Self { lower: 2501, upper: 5000 };
    /// Everything
    pub const ALL: Self = Self { lower: 0, upper: 5000 };

    /// Check if a queue value falls inside the range
    pub fn contains(&self, queue: u32) -> bool {
        (self.lower..=self.upper).contains(&queue)
    }
}

/// Filtering applied to visible renderers before drawing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilteringSettings {
    pub render_queue_range: RenderQueueRange,
}

impl FilteringSettings {
    pub fn new(render_queue_range: RenderQueueRange) -> Self {
        Self { render_queue_range }
    }
}

impl Default for FilteringSettings {
    fn default() -> Self {
        Self::new(RenderQueueRange::ALL)
    }
}

/// Material used to replace an object's own material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverrideMaterial {
    /// Host's magenta error material
    Error,
}

/// Describes how a batch of visible renderers is drawn
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingSettings {
    shader_passes: [Option<ShaderTagId>; MAX_SHADER_PASSES],

    /// Sort order
    pub sorting: SortingCriteria,

    /// Let the host merge small meshes
    pub enable_dynamic_batching: bool,

    /// Let the host instance identical meshes
    pub enable_instancing: bool,

    /// Replace object materials
    pub override_material: Option<OverrideMaterial>,
}

impl DrawingSettings {
    /// Create settings drawing `pass` at the highest priority
    pub fn new(pass: ShaderTagId, sorting: SortingCriteria) -> Self {
        let mut shader_passes = [None; MAX_SHADER_PASSES];
        shader_passes[0] = Some(pass);
        Self {
            shader_passes,
            sorting,
            enable_dynamic_batching: false,
            enable_instancing: false,
            override_material: None,
        }
    }

    /// Register a shader pass at a priority slot (0 is tried first)
    pub fn set_shader_pass(&mut self, index: usize, pass: ShaderTagId) {
        debug_assert!(index < MAX_SHADER_PASSES, "shader pass slot {index} out of range");
        if let Some(slot) = self.shader_passes.get_mut(index) {
            *slot = Some(pass);
        }
    }

    /// Pass registered at a slot
    pub fn shader_pass(&self, index: usize) -> Option<ShaderTagId> {
        self.shader_passes.get(index).copied().flatten()
    }

    /// Registered passes in priority order
    pub fn shader_passes(&self) -> impl Iterator<Item = ShaderTagId> + '_ {
        self.shader_passes.iter().flatten().copied()
    }
}

/// Describes one shadow caster draw for a light and cascade
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowDrawingSettings {
    /// Index into the culling results' visible lights
    pub visible_light_index: usize,

    /// Cascade split the casters are culled against
    pub split_data: ShadowSplitData,
}
