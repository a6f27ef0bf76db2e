//! Pipeline Configuration
//!
//! Pipeline asset and shadow settings with serde support. Settings are
//! read-only while a frame renders; load them once with
//! [`PipelineSettings::from_json`] or build them in code.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::shadow::MAX_CASCADES;

/// Pipeline asset configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Let the host merge small meshes into dynamic batches
    pub use_dynamic_batching: bool,

    /// Let the host draw identical meshes with GPU instancing
    pub use_gpu_instancing: bool,

    /// Enable the host's SRP batcher
    pub use_srp_batcher: bool,

    /// Run the unsupported-shader and gizmo debug passes
    pub editor_passes: bool,

    /// Shadow configuration
    pub shadows: ShadowSettings,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            use_dynamic_batching: true,
            use_gpu_instancing: true,
            use_srp_batcher: true,
            editor_passes: true,
            shadows: ShadowSettings::default(),
        }
    }
}

impl PipelineSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<()> {
        self.shadows.validate()
    }
}

/// Global shadow configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// Shadows are only rendered up to this distance from the camera
    pub max_distance: f32,

    /// Directional light shadow atlas settings
    pub directional: DirectionalShadowSettings,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            directional: DirectionalShadowSettings::default(),
        }
    }
}

impl ShadowSettings {
    /// Validate without modifying
    pub fn validate(&self) -> Result<()> {
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            return Err(ConfigError::InvalidShadowDistance(self.max_distance));
        }
        self.directional.validate()
    }

    /// Clamp values to valid ranges, warning about each adjustment
    pub fn sanitize(&mut self) {
        if !self.max_distance.is_finite() || self.max_distance < 0.0 {
            log::warn!("Shadow distance {} out of range, clamping to 0", self.max_distance);
            self.max_distance = 0.0;
        }

        let dir = &mut self.directional;
        let count = dir.cascade_count.clamp(1, MAX_CASCADES as u32);
        if count != dir.cascade_count {
            log::warn!("Cascade count {} out of range, clamping to {}", dir.cascade_count, count);
            dir.cascade_count = count;
        }

        let mut previous = 0.0f32;
        for ratio in [
            &mut dir.cascade_ratio_1,
            &mut dir.cascade_ratio_2,
            &mut dir.cascade_ratio_3,
        ] {
            let clamped = if ratio.is_nan() { previous } else { ratio.clamp(previous, 1.0) };
            if clamped != *ratio {
                log::warn!("Cascade ratio {} out of range, clamping to {}", ratio, clamped);
                *ratio = clamped;
            }
            previous = clamped;
        }
    }
}

/// Directional light shadow atlas configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalShadowSettings {
    /// Atlas width and height
    pub atlas_size: MapSize,

    /// Cascades per light (1-4)
    pub cascade_count: u32,

    /// Fraction of the shadow distance covered by the first cascade
    pub cascade_ratio_1: f32,

    /// Fraction covered by the first two cascades
    pub cascade_ratio_2: f32,

    /// Fraction covered by the first three cascades
    pub cascade_ratio_3: f32,
}

impl Default for DirectionalShadowSettings {
    fn default() -> Self {
        Self {
            atlas_size: MapSize::S1024,
            cascade_count: 4,
            cascade_ratio_1: 0.1,
            cascade_ratio_2: 0.25,
            cascade_ratio_3: 0.5,
        }
    }
}

impl DirectionalShadowSettings {
    /// The three split ratios packed as passed to cascade computation
    pub fn cascade_ratios(&self) -> Vec3 {
        Vec3::new(self.cascade_ratio_1, self.cascade_ratio_2, self.cascade_ratio_3)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_CASCADES as u32).contains(&self.cascade_count) {
            return Err(ConfigError::InvalidCascadeCount(self.cascade_count));
        }

        let ratios = [self.cascade_ratio_1, self.cascade_ratio_2, self.cascade_ratio_3];
        let in_range = ratios.iter().all(|r| (0.0..=1.0).contains(r));
        let monotonic = ratios.windows(2).all(|w| w[0] <= w[1]);
        if !in_range || !monotonic {
            return Err(ConfigError::InvalidCascadeRatios(ratios));
        }

        Ok(())
    }
}

/// Supported shadow atlas sizes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MapSize {
    S256,
    S512,
    #[default]
    S1024,
    S2048,
    S4096,
    S8192,
}

impl MapSize {
    /// Width (and height) in pixels
    pub fn pixels(self) -> u32 {
        match self {
            Self::S256 => 256,
            Self::S512 => 512,
            Self::S1024 => 1024,
            Self::S2048 => 2048,
            Self::S4096 => 4096,
            Self::S8192 => 8192,
        }
    }
}

impl TryFrom<u32> for MapSize {
    type Error = ConfigError;

    fn try_from(pixels: u32) -> Result<Self> {
        match pixels {
            256 => Ok(Self::S256),
            512 => Ok(Self::S512),
            1024 => Ok(Self::S1024),
            2048 => Ok(Self::S2048),
            4096 => Ok(Self::S4096),
            8192 => Ok(Self::S8192),
            other => Err(ConfigError::InvalidAtlasSize(other)),
        }
    }
}

impl From<MapSize> for u32 {
    fn from(size: MapSize) -> Self {
        size.pixels()
    }
}

/// Shadow quality preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShadowQuality {
    /// Small atlas, two cascades, short distance
    Low,
    /// Defaults
    Medium,
    /// Large atlas, four cascades, long distance
    High,
}

impl ShadowQuality {
    /// Convert to shadow settings
    pub fn to_settings(self) -> ShadowSettings {
        match self {
            Self::Low => ShadowSettings {
                max_distance: 50.0,
                directional: DirectionalShadowSettings {
                    atlas_size: MapSize::S512,
                    cascade_count: 2,
                    cascade_ratio_1: 0.3,
                    cascade_ratio_2: 0.6,
                    cascade_ratio_3: 0.9,
                },
            },
            Self::Medium => ShadowSettings::default(),
            Self::High => ShadowSettings {
                max_distance: 150.0,
                directional: DirectionalShadowSettings {
                    atlas_size: MapSize::S2048,
                    cascade_count: 4,
                    ..Default::default()
                },
            },
        }
    }
}
