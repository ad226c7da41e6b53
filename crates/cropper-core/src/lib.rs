//! Cropper Core - interactive image cropping
//!
//! This crate holds everything the media cropper does that does not depend on
//! a browser: resize and pinch geometry, the drag-session state machine, the
//! viewport controller that drives the host through the [`viewport::Layout`]
//! and [`viewport::InputSource`] traits, and raster decode/resample/encode
//! for the re-render and crop steps.
//!
//! # Module Structure
//!
//! - `geometry` - Points, rectangles, handle directions, resize/pinch math
//! - `session` - Press/move/release state for resize and move drags
//! - `viewport` - Persistent cropper state and host I/O
//! - `crop` - Crop rectangle and region extraction
//! - `decode` / `encode` - JPEG and PNG rasters
//! - `config` / `error` - Options and error types

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod session;
pub mod viewport;

pub use config::{ConfigError, CropperOptions};
pub use decode::{decode_image, DecodedImage, FilterType};
pub use encode::{EncodedImage, OutputFormat};
pub use error::CropperError;
pub use geometry::{Bounds, Direction, Point, Rect, Size};
pub use session::{InputEvent, Propagation, SessionKind};
pub use viewport::{Element, InputSource, Layout, ViewportController};
