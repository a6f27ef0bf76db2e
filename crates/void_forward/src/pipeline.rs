//! Forward Pipeline Entry Point
//!
//! Owns the pipeline settings and a single [`CameraRenderer`], and renders
//! the host's cameras one after another each frame.

use crate::camera::CameraRenderer;
use crate::error::Result;
use crate::host::{Camera, GraphicsSettings, RenderContext};
use crate::settings::PipelineSettings;
use crate::stats::FrameStats;

/// Forward render pipeline
#[derive(Debug)]
pub struct ForwardPipeline {
    settings: PipelineSettings,
    renderer: CameraRenderer,
    last_frame: FrameStats,
}

impl ForwardPipeline {
    /// Create the pipeline and apply its global graphics settings to the host
    ///
    /// Out-of-range shadow settings are clamped with a warning.
    pub fn new(mut settings: PipelineSettings, ctx: &mut dyn RenderContext) -> Self {
        settings.shadows.sanitize();

        let graphics = GraphicsSettings {
            use_srp_batcher: settings.use_srp_batcher,
            lights_use_linear_intensity: true,
        };
        ctx.configure_graphics(&graphics);

        log::info!(
            "Forward pipeline: batching={} instancing={} srp_batcher={} shadows={}px x{} cascades, {}m",
            settings.use_dynamic_batching,
            settings.use_gpu_instancing,
            settings.use_srp_batcher,
            settings.shadows.directional.atlas_size.pixels(),
            settings.shadows.directional.cascade_count,
            settings.shadows.max_distance
        );

        Self {
            settings,
            renderer: CameraRenderer::new(),
            last_frame: FrameStats::default(),
        }
    }

    /// Create the pipeline from a JSON settings document
    pub fn from_json(json: &str, ctx: &mut dyn RenderContext) -> Result<Self> {
        let settings = PipelineSettings::from_json(json)?;
        Ok(Self::new(settings, ctx))
    }

    /// Render every camera in order
    pub fn render(&mut self, ctx: &mut dyn RenderContext, cameras: &[Camera]) -> FrameStats {
        let mut frame = FrameStats {
            cameras_requested: cameras.len() as u32,
            ..Default::default()
        };

        for camera in cameras {
            match self.renderer.render(ctx, camera, &self.settings) {
                Some(stats) => frame.cameras.push(stats),
                None => frame.cameras_skipped += 1,
            }
        }

        log::trace!(
            "Frame: {} cameras rendered, {} skipped, {} shadow draws",
            frame.cameras_rendered(),
            frame.cameras_skipped,
            frame.shadow_draws()
        );

        self.last_frame = frame.clone();
        frame
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Statistics of the last rendered frame
    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }
}
