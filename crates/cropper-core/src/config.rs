//! Cropper configuration.
//!
//! Options arrive from the host as a plain object; every field is optional
//! and falls back to its default. Unknown keys are an error, so a size limit
//! given outside `bounds` is not silently ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::FilterType;
use crate::encode::OutputFormat;
use crate::geometry::Bounds;

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A bound is zero, negative, NaN or infinite.
    #[error("Bound {name} must be a positive finite number, got {value}")]
    InvalidBound { name: &'static str, value: f64 },

    /// A minimum is not below its maximum.
    #[error("{axis} bounds are empty: min ({min}) must be less than max ({max})")]
    EmptyRange { axis: &'static str, min: f64, max: f64 },

    /// JPEG quality outside 1-100.
    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),
}

/// Options for a cropper instance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct CropperOptions {
    /// Size limits for resizing.
    pub bounds: Bounds,
    /// Start with the aspect ratio locked.
    pub constrain: bool,
    /// Format for the re-rendered source and for crops.
    pub output: OutputFormat,
    /// Resampling filter for the re-render after a resize.
    pub filter: FilterType,
}

impl CropperOptions {
    /// Check the options for values the cropper cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bounds;
        for (name, value) in [
            ("minWidth", b.min_width),
            ("minHeight", b.min_height),
            ("maxWidth", b.max_width),
            ("maxHeight", b.max_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidBound { name, value });
            }
        }

        if b.min_width >= b.max_width {
            return Err(ConfigError::EmptyRange {
                axis: "Width",
                min: b.min_width,
                max: b.max_width,
            });
        }
        if b.min_height >= b.max_height {
            return Err(ConfigError::EmptyRange {
                axis: "Height",
                min: b.min_height,
                max: b.max_height,
            });
        }

        if let OutputFormat::Jpeg { quality } = self.output {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::InvalidQuality(quality));
            }
        }

        Ok(())
    }
}
