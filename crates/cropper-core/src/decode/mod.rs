//! Decoding and resampling of the image being cropped.
//!
//! The original is decoded once, when the cropper opens, and is never
//! modified afterwards. Each finished resize resamples that original to the
//! new on-screen size, so quality loss never compounds across resizes.
//!
//! # Examples
//!
//! ```ignore
//! use cropper_core::decode::{decode_image, resize, FilterType};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let original = decode_image(&bytes).unwrap();
//! let preview = resize(&original, 320, 180, FilterType::Bilinear).unwrap();
//! ```

mod raster;
mod source;

use thiserror::Error;

pub use raster::{resize, DecodedImage, FilterType};
pub use source::{decode_image, Orientation};

/// Errors from decoding or resampling.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Empty input, or bytes that are neither JPEG nor PNG.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// A JPEG or PNG that the decoder could not read.
    #[error("Failed to decode image: {0}")]
    CorruptedFile(String),

    /// A resample target with a zero side.
    #[error("Cannot resample to {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
