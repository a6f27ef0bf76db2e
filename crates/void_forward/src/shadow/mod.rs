//! Directional Shadow Mapping
//!
//! Cascaded shadow maps for directional lights, rendered into a single
//! square atlas that is allocated as a temporary target every frame.
//!
//! # Architecture
//!
//! - **Atlas**: tile layout, tile viewports and the clip-to-atlas matrix remap
//! - **Caster**: per-frame light reservation, cascade rendering and the
//!   atlas target lifecycle
//! - **Data**: GPU-ready snapshot of the published shadow globals
//!
//! # Frame lifecycle
//!
//! ```ignore
//! shadows.setup(&settings);
//! for (index, light) in culling.visible_lights.iter().enumerate() {
//!     let shadow_data = shadows.reserve_directional_shadows(ctx, &culling, light, index);
//! }
//! shadows.render(ctx, &culling);
//! // ... draw geometry sampling the atlas ...
//! shadows.cleanup(ctx);
//! ```

pub mod atlas;
pub mod caster;
pub mod data;

/// Maximum directional lights with shadows per frame
pub const MAX_SHADOWED_DIRECTIONAL_LIGHTS: usize = 4;

/// Maximum cascades per directional light
pub const MAX_CASCADES: usize = 4;

/// Maximum atlas tiles (one per light and cascade)
pub const MAX_TILES: usize = MAX_SHADOWED_DIRECTIONAL_LIGHTS * MAX_CASCADES;

pub use atlas::{atlas_matrix, split_for_tiles, AtlasLayout, AtlasTarget, ShadowAtlasState};
pub use caster::{ShadowStats, ShadowedDirectionalLight, Shadows};
pub use data::GpuShadowUniforms;
