//! The `MediaCropper` class exposed to JavaScript.
//!
//! # Example
//!
//! ```typescript
//! import init, { MediaCropper } from '@media-cropper/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const cropper = new MediaCropper(img, container, overlay, bytes, {
//!   bounds: { minWidth: 60, minHeight: 60, maxWidth: 800, maxHeight: 900 },
//!   output: { type: 'jpeg', quality: 90 },
//! });
//!
//! for (const handle of container.querySelectorAll('[data-direction]')) {
//!   handle.addEventListener('mousedown', (e) => cropper.startResize(e));
//!   handle.addEventListener('touchstart', (e) => cropper.startResize(e));
//! }
//! img.addEventListener('mousedown', (e) => cropper.startMove(e));
//! img.addEventListener('touchstart', (e) => cropper.startMove(e));
//!
//! const blob = new Blob([cropper.crop()], { type: cropper.cropMimeType });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use cropper_core::config::CropperOptions;
use cropper_core::viewport::{Layout, ViewportController};
use tracing::info;
use wasm_bindgen::prelude::*;
use web_sys::{Event, HtmlElement, HtmlImageElement};

use crate::dom::DomLayout;
use crate::event::{apply_propagation, input_event};
use crate::listeners::DocumentListeners;

pub(crate) type Controller = ViewportController<DomLayout, DocumentListeners>;

/// An interactive cropper bound to an image, its container and an overlay.
///
/// The container must be absolutely positioned inside its parent and
/// shrink-wrap the image. The overlay marks the region that `crop()` keeps.
#[wasm_bindgen]
pub struct MediaCropper {
    inner: Rc<RefCell<Controller>>,
}

#[wasm_bindgen]
impl MediaCropper {
    /// Create a cropper.
    ///
    /// # Arguments
    ///
    /// * `source` - The `<img>` showing the image
    /// * `container` - The positioned box around the image and its handles
    /// * `overlay` - The crop frame
    /// * `bytes` - The original JPEG or PNG file
    /// * `options` - Plain options object; `undefined` or `null` for defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid, the bytes cannot be
    /// decoded, or there is no window/document.
    #[wasm_bindgen(constructor)]
    pub fn new(
        source: HtmlImageElement,
        container: HtmlElement,
        overlay: HtmlElement,
        bytes: &[u8],
        options: JsValue,
    ) -> Result<MediaCropper, JsValue> {
        let options = parse_options(options)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document available"))?;

        let layout = DomLayout::new(window, source, container, overlay);
        let listeners = DocumentListeners::new(document);
        let controller = ViewportController::from_bytes(layout, listeners, bytes, options)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let inner = Rc::new(RefCell::new(controller));
        inner
            .borrow_mut()
            .input_mut()
            .install(Rc::downgrade(&inner));

        {
            let cropper = inner.borrow();
            info!(
                width = cropper.original().width,
                height = cropper.original().height,
                "media cropper ready"
            );
        }
        Ok(Self { inner })
    }

    /// Begin a resize. Call from a handle's `mousedown`/`touchstart`; the
    /// handle must carry a `data-direction` of `se`, `sw`, `nw` or `ne`.
    #[wasm_bindgen(js_name = startResize)]
    pub fn start_resize(&self, event: &Event) {
        let mut cropper = self.inner.borrow_mut();
        let input = input_event(event, cropper.layout().scroll());
        let propagation = cropper.start_resize(&input);
        apply_propagation(event, propagation);
    }

    /// Begin a move (or pinch). Call from the image's `mousedown`/`touchstart`.
    #[wasm_bindgen(js_name = startMove)]
    pub fn start_move(&self, event: &Event) {
        let mut cropper = self.inner.borrow_mut();
        let input = input_event(event, cropper.layout().scroll());
        let propagation = cropper.start_move(&input);
        apply_propagation(event, propagation);
    }

    /// Encode the region under the overlay.
    pub fn crop(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .borrow()
            .crop()
            .map(|encoded| encoded.bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// MIME type of the bytes returned by `crop()`.
    #[wasm_bindgen(getter, js_name = cropMimeType)]
    pub fn crop_mime_type(&self) -> String {
        self.inner.borrow().options().output.mime_type().to_string()
    }

    /// Whether the aspect ratio stays locked without holding shift.
    #[wasm_bindgen(getter)]
    pub fn constrain(&self) -> bool {
        self.inner.borrow().constrain()
    }

    #[wasm_bindgen(setter)]
    pub fn set_constrain(&self, constrain: bool) {
        self.inner.borrow_mut().set_constrain(constrain);
    }

    /// Displayed image width in CSS pixels.
    #[wasm_bindgen(getter, js_name = imageWidth)]
    pub fn image_width(&self) -> f64 {
        self.inner.borrow().image_size().width
    }

    /// Displayed image height in CSS pixels.
    #[wasm_bindgen(getter, js_name = imageHeight)]
    pub fn image_height(&self) -> f64 {
        self.inner.borrow().image_size().height
    }
}

/// Read options from a plain JS object.
fn parse_options(value: JsValue) -> Result<CropperOptions, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropperOptions::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid cropper options: {}", e)))
}
