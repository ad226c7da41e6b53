//! [`Layout`] backed by real DOM elements.

use cropper_core::encode::EncodedImage;
use cropper_core::geometry::{Point, Rect, Size};
use cropper_core::viewport::{Element, Layout};
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, HtmlElement, HtmlImageElement, Url, Window};

/// The page elements a cropper instance works on.
pub(crate) struct DomLayout {
    window: Window,
    source: HtmlImageElement,
    container: HtmlElement,
    overlay: HtmlElement,
    /// Object URL currently assigned to the source image.
    object_url: Option<String>,
}

impl DomLayout {
    pub(crate) fn new(
        window: Window,
        source: HtmlImageElement,
        container: HtmlElement,
        overlay: HtmlElement,
    ) -> Self {
        Self {
            window,
            source,
            container,
            overlay,
            object_url: None,
        }
    }

    fn element(&self, element: Element) -> Option<web_sys::Element> {
        match element {
            Element::Source => Some(self.source.clone().into()),
            Element::Container => Some(self.container.clone().into()),
            Element::Parent => self.container.parent_element(),
            Element::Overlay => Some(self.overlay.clone().into()),
        }
    }

    fn style_target(&self, element: Element) -> Option<&HtmlElement> {
        match element {
            Element::Source => Some(&*self.source),
            Element::Container => Some(&self.container),
            Element::Overlay => Some(&self.overlay),
            Element::Parent => None,
        }
    }

    fn set_px(&self, element: Element, properties: [(&str, f64); 2]) {
        let Some(target) = self.style_target(element) else {
            warn!(?element, "element is not styleable");
            return;
        };
        let style = target.style();
        for (name, value) in properties {
            if let Err(e) = style.set_property(name, &format!("{value}px")) {
                warn!(?element, name, error = ?e, "failed to set style");
            }
        }
    }

    fn replace_source(&mut self, image: &EncodedImage) -> Result<(), JsValue> {
        let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        options.set_type(image.mime_type());
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

        let url = Url::create_object_url_with_blob(&blob)?;
        self.source.set_src(&url);
        if let Some(previous) = self.object_url.replace(url) {
            Url::revoke_object_url(&previous)?;
        }
        Ok(())
    }
}

impl Layout for DomLayout {
    fn bounding_box(&self, element: Element) -> Rect {
        let Some(el) = self.element(element) else {
            return Rect::default();
        };
        let rect = el.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn scroll(&self) -> Point {
        Point::new(
            self.window.scroll_x().unwrap_or(0.0),
            self.window.scroll_y().unwrap_or(0.0),
        )
    }

    fn set_position(&mut self, element: Element, position: Point) {
        self.set_px(element, [("left", position.x), ("top", position.y)]);
    }

    fn set_size(&mut self, element: Element, size: Size) {
        self.set_px(element, [("width", size.width), ("height", size.height)]);
    }

    fn set_image_source(&mut self, image: &EncodedImage) {
        if let Err(e) = self.replace_source(image) {
            warn!(error = ?e, "failed to replace image source");
        }
    }
}

impl Drop for DomLayout {
    fn drop(&mut self) {
        if let Some(url) = self.object_url.take() {
            let _ = Url::revoke_object_url(&url);
        }
    }
}
