//! Raster encoding for the cropper's outputs.
//!
//! This module provides functionality for:
//! - Encoding the re-rendered source image after a resize
//! - Encoding the final crop
//!
//! Both go through [`encode`] with the configured [`OutputFormat`].
//!
//! # Examples
//!
//! ```ignore
//! use cropper_core::decode::DecodedImage;
//! use cropper_core::encode::{encode, OutputFormat};
//!
//! let image = DecodedImage::blank(100, 100);
//! let encoded = encode(&image, OutputFormat::Jpeg { quality: 90 }).unwrap();
//! println!("Encoded {} bytes of {}", encoded.bytes.len(), encoded.mime_type());
//! ```

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodedImage;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Default JPEG quality for re-rendered and cropped images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG with quality 1-100.
    Jpeg {
        #[serde(default = "default_jpeg_quality")]
        quality: u8,
    },
    /// Lossless PNG.
    Png,
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// An encoded image plus the pixel size it was encoded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Check that `pixels` holds exactly `width * height` RGB pixels.
fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode a decoded image in the given format.
pub fn encode(image: &DecodedImage, format: OutputFormat) -> Result<EncodedImage, EncodeError> {
    let bytes = match format {
        OutputFormat::Jpeg { quality } => {
            encode_jpeg(&image.pixels, image.width, image.height, quality)?
        }
        OutputFormat::Png => encode_png(&image.pixels, image.width, image.height)?,
    };

    Ok(EncodedImage {
        format,
        width: image.width,
        height: image.height,
        bytes,
    })
}
