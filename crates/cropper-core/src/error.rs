//! Top-level error type for fallible cropper operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;

/// Errors returned by [`ViewportController`](crate::viewport::ViewportController).
///
/// Interaction ticks never fail; only construction, re-rendering and
/// cropping do.
#[derive(Debug, Error)]
pub enum CropperError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// The original image has no pixels.
    #[error("Source image is empty")]
    EmptySource,

    /// The overlay has no area, so there is nothing to crop.
    #[error("Crop region is empty: {width}x{height}")]
    EmptyCrop { width: f64, height: f64 },

    /// A re-render target that rounds to zero pixels.
    #[error("Invalid render size: {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}
