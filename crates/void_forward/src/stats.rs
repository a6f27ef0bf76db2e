//! Render Statistics
//!
//! Counts collected while rendering a frame, for profiling overlays and
//! tests. Collection is a by-product of rendering and never changes what
//! is drawn.

use serde::{Deserialize, Serialize};

use crate::host::CameraId;
use crate::shadow::ShadowStats;

/// Statistics for one rendered camera
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraStats {
    pub camera: CameraId,

    /// Lights reported by culling
    pub visible_lights: u32,

    /// Directional lights uploaded to shaders
    pub directional_lights: u32,

    /// Renderer batches issued (opaque, transparent, unsupported)
    pub renderer_draws: u32,

    // === Shadows ===
    pub shadows: ShadowStats,
}

/// Statistics for one pipeline frame
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    /// Cameras passed to the pipeline
    pub cameras_requested: u32,

    /// Cameras skipped because they could not be culled
    pub cameras_skipped: u32,

    /// Per-camera statistics, in render order
    pub cameras: Vec<CameraStats>,
}

impl FrameStats {
    /// Cameras actually rendered
    pub fn cameras_rendered(&self) -> u32 {
        self.cameras.len() as u32
    }

    /// Renderer batches across all cameras
    pub fn renderer_draws(&self) -> u32 {
        self.cameras.iter().map(|c| c.renderer_draws).sum()
    }

    /// Shadow caster draws across all cameras
    pub fn shadow_draws(&self) -> u32 {
        self.cameras.iter().map(|c| c.shadows.draw_calls).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let stats = FrameStats {
            cameras_requested: 3,
            cameras_skipped: 1,
            cameras: vec![
                CameraStats {
                    camera: 1,
                    renderer_draws: 2,
                    shadows: ShadowStats { shadowed_lights: 1, tiles: 4, draw_calls: 4 },
                    ..Default::default()
                },
                CameraStats {
                    camera: 2,
                    renderer_draws: 3,
                    ..Default::default()
                },
            ],
        };

        assert_eq!(stats.cameras_rendered(), 2);
        assert_eq!(stats.renderer_draws(), 5);
        assert_eq!(stats.shadow_draws(), 4);
    }

    #[test]
    fn test_serialization() {
        let stats = FrameStats {
            cameras_requested: 1,
            cameras_skipped: 0,
            cameras: vec![CameraStats { camera: 7, directional_lights: 2, ..Default::default() }],
        };

        let json = stats.to_json().unwrap();
        let restored: FrameStats = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, stats);
    }
}
