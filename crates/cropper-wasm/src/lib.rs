//! Cropper WASM - WebAssembly bindings for the media cropper
//!
//! This crate wires cropper-core to the browser: element geometry and styles
//! through the DOM, document-level mouse/touch listeners, and a
//! `MediaCropper` class for JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `cropper` - The `MediaCropper` class
//! - `dom` - `Layout` over the image, container and overlay elements
//! - `listeners` - `InputSource` over document event listeners
//! - `event` - DOM event to `InputEvent` conversion
//! - `logging` - `tracing` output to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { MediaCropper } from '@media-cropper/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new MediaCropper(img, container, overlay, bytes, undefined);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod dom;
mod event;
mod listeners;
mod logging;

pub use cropper::MediaCropper;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init_logging(logging::DEFAULT_FILTER);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
