//! Render Resources - host resource descriptions
//!
//! Abstract descriptions of the targets and shader globals the pipeline
//! touches. The host owns the actual GPU objects; the pipeline refers to them
//! by [`ShaderProperty`] name.

use serde::{Deserialize, Serialize};

/// Name of a shader global or temporary render target
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderProperty(&'static str);

impl ShaderProperty {
    /// Create from a name
    pub const fn from_name(name: &'static str) -> Self {
        Self(name)
    }

    /// Get the property name
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl core::fmt::Display for ShaderProperty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

/// Shader globals published by the pipeline
pub mod ids {
    use super::ShaderProperty;

    pub const DIR_LIGHT_COUNT: ShaderProperty = ShaderProperty::from_name("_DirectionalLightCount");
    pub const DIR_LIGHT_COLORS: ShaderProperty =
        ShaderProperty::from_name("_DirectionalLightColors");
    pub const DIR_LIGHT_DIRECTIONS: ShaderProperty =
        ShaderProperty::from_name("_DirectionalLightDirections");
    pub const DIR_LIGHT_SHADOW_DATA: ShaderProperty =
        ShaderProperty::from_name("_DirectionalLightShadowData");

    pub const DIR_SHADOW_ATLAS: ShaderProperty =
        ShaderProperty::from_name("_DirectionalShadowAtlas");
    pub const DIR_SHADOW_MATRICES: ShaderProperty =
        ShaderProperty::from_name("_DirectionalShadowMatrices");
    pub const CASCADE_COUNT: ShaderProperty = ShaderProperty::from_name("_CascadeCount");
    pub const CASCADE_CULLING_SPHERES: ShaderProperty =
        ShaderProperty::from_name("_CascadeCullingSpheres");
    pub const SHADOW_DISTANCE: ShaderProperty = ShaderProperty::from_name("_ShadowDistance");
}

/// Texture filtering mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    Point,
    Bilinear,
    Trilinear,
}

/// Format of a temporary render target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetFormat {
    /// Depth-only target sampled with hardware comparison
    Shadowmap,
    /// Color target
    Rgba8Unorm,
}

impl TargetFormat {
    /// Check if this is a depth format
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::Shadowmap)
    }
}

/// Description of a temporary 2D render target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemporaryTargetDesc {
    pub width: u32,
    pub height: u32,
    /// Depth buffer bits (0 = none)
    pub depth_bits: u32,
    pub filter: FilterMode,
    pub format: TargetFormat,
}

impl TemporaryTargetDesc {
    /// Square bilinear 32-bit shadow map target
    pub fn shadow_map(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            depth_bits: 32,
            filter: FilterMode::Bilinear,
            format: TargetFormat::Shadowmap,
        }
    }
}

/// What happens to target contents when it becomes active
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadAction {
    Load,
    Clear,
    DontCare,
}

/// What happens to target contents when rendering to it finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreAction {
    Store,
    DontCare,
}

/// Pixel rectangle within a render target
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }
}
