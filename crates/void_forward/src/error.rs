//! Error types for pipeline configuration
//!
//! Rendering itself never fails; skipped cameras and unshadowed lights are
//! steady-state outcomes. Only loading and validating settings can error.

use thiserror::Error;

/// Pipeline configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings document could not be parsed
    #[error("Failed to parse pipeline settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// Atlas size is not one of the supported power-of-two sizes
    #[error("Invalid shadow atlas size: {0} (expected a power of two in 256..=8192)")]
    InvalidAtlasSize(u32),

    /// Cascade count outside 1..=4
    #[error("Invalid cascade count: {0} (expected 1..=4)")]
    InvalidCascadeCount(u32),

    /// Cascade ratios outside [0, 1] or not monotonic
    #[error("Invalid cascade ratios: {0:?}")]
    InvalidCascadeRatios([f32; 3]),

    /// Shadow distance negative or not finite
    #[error("Invalid max shadow distance: {0}")]
    InvalidShadowDistance(f32),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
