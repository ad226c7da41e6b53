//! The viewport controller: persistent cropper state and host I/O.
//!
//! The controller owns the original image, the current backing raster, the
//! displayed image size, the aspect-lock mode and both drag sessions. It is
//! the only part of the crate that talks to the host, through two
//! capabilities handed in at construction:
//!
//! - [`Layout`] - element geometry queries and style writes
//! - [`InputSource`] - document-level move/release listeners
//!
//! # Event Flow
//!
//! ```text
//! press   -> start_resize / start_move -> capture SessionState, attach listeners
//! move    -> resize_tick / move_tick   -> InteractionSession::tick -> apply Transform
//! release -> end_resize / end_move     -> detach listeners (+ re-render after resize)
//! button  -> crop                      -> CropRect -> extract_region -> encode
//! ```

use tracing::{debug, warn};

use crate::config::CropperOptions;
use crate::crop::{crop_rect, extract_region};
use crate::decode::{decode_image, resize, DecodedImage};
use crate::encode::{encode, EncodedImage};
use crate::error::CropperError;
use crate::geometry::{Point, Rect, Size};
use crate::session::{
    InputEvent, InteractionSession, Propagation, SessionKind, SessionState, TickContext,
    Transform,
};

/// The elements the cropper reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// The displayed image.
    Source,
    /// The positioned box holding the image.
    Container,
    /// The container's parent, which container offsets are relative to.
    Parent,
    /// The fixed frame marking the region to crop.
    Overlay,
}

/// Element geometry and styling provided by the host.
pub trait Layout {
    /// Bounding box of `element` in viewport coordinates.
    fn bounding_box(&self, element: Element) -> Rect;

    /// Current page scroll offset.
    fn scroll(&self) -> Point;

    /// Write `element`'s position, relative to its parent.
    fn set_position(&mut self, element: Element, position: Point);

    /// Write `element`'s displayed size.
    fn set_size(&mut self, element: Element, size: Size);

    /// Replace the displayed image's pixel source.
    fn set_image_source(&mut self, image: &EncodedImage);
}

/// Document-level listeners for an active drag.
///
/// Move and release events are taken from the whole document so a drag keeps
/// tracking after the pointer leaves the element it started on.
pub trait InputSource {
    /// Start delivering move/release events for `kind`.
    fn attach(&mut self, kind: SessionKind);

    /// Stop delivering them. Must be a no-op when not attached.
    fn detach(&mut self, kind: SessionKind);
}

/// Cropper state plus the host capabilities it drives.
pub struct ViewportController<L, I> {
    layout: L,
    input: I,
    options: CropperOptions,
    original: DecodedImage,
    aspect_ratio: f64,
    source: DecodedImage,
    image_size: Size,
    constrain: bool,
    resize: InteractionSession,
    movement: InteractionSession,
}

impl<L: Layout, I: InputSource> ViewportController<L, I> {
    /// Create a controller for an already decoded original image.
    ///
    /// The displayed size starts as the source element's current size, or the
    /// image's natural size if the element has not been laid out yet.
    ///
    /// # Errors
    ///
    /// Returns `CropperError::Config` for invalid options and
    /// `CropperError::EmptySource` for an image without pixels.
    pub fn new(
        layout: L,
        input: I,
        original: DecodedImage,
        options: CropperOptions,
    ) -> Result<Self, CropperError> {
        options.validate()?;
        if original.is_empty() {
            return Err(CropperError::EmptySource);
        }
        let aspect_ratio = original.aspect_ratio().ok_or(CropperError::EmptySource)?;

        let laid_out = layout.bounding_box(Element::Source).size();
        let image_size = if laid_out.aspect_ratio().is_some() {
            laid_out
        } else {
            original.size()
        };

        debug!(
            width = original.width,
            height = original.height,
            aspect_ratio,
            "cropper initialized"
        );

        Ok(Self {
            layout,
            input,
            constrain: options.constrain,
            options,
            source: original.clone(),
            original,
            aspect_ratio,
            image_size,
            resize: InteractionSession::new(SessionKind::Resize),
            movement: InteractionSession::new(SessionKind::Move),
        })
    }

    /// Create a controller from encoded image bytes.
    pub fn from_bytes(
        layout: L,
        input: I,
        bytes: &[u8],
        options: CropperOptions,
    ) -> Result<Self, CropperError> {
        let original = decode_image(bytes)?;
        Self::new(layout, input, original, options)
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn options(&self) -> &CropperOptions {
        &self.options
    }

    /// The image as first loaded. Every re-render starts from this.
    pub fn original(&self) -> &DecodedImage {
        &self.original
    }

    /// The raster currently backing the displayed image.
    pub fn source(&self) -> &DecodedImage {
        &self.source
    }

    /// The size the image is displayed at.
    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Whether the aspect ratio is locked regardless of modifier keys.
    pub fn constrain(&self) -> bool {
        self.constrain
    }

    pub fn set_constrain(&mut self, constrain: bool) {
        self.constrain = constrain;
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    pub fn is_moving(&self) -> bool {
        self.movement.is_active()
    }

    /// Press on a resize handle.
    ///
    /// Presses without a direction tag or position are ignored.
    pub fn start_resize(&mut self, event: &InputEvent) -> Propagation {
        if event.direction.is_none() {
            debug!("resize press without a direction tag ignored");
            return Propagation::Ignore;
        }
        self.start(SessionKind::Resize, event)
    }

    /// Press on the image.
    pub fn start_move(&mut self, event: &InputEvent) -> Propagation {
        self.start(SessionKind::Move, event)
    }

    /// Move event while a resize may be active.
    pub fn resize_tick(&mut self, event: &InputEvent) -> Propagation {
        let transform = self.resize.tick(event, &self.tick_context());
        self.apply(transform);
        Propagation::Ignore
    }

    /// Move event while a move may be active.
    pub fn move_tick(&mut self, event: &InputEvent) -> Propagation {
        if !self.movement.is_active() {
            return Propagation::Ignore;
        }
        let transform = self.movement.tick(event, &self.tick_context());
        self.apply(transform);
        Propagation::Consume
    }

    /// Release ending a resize.
    ///
    /// Listeners are always detached. If a resize was active, the backing
    /// raster is re-rendered from the original at the displayed size.
    pub fn end_resize(&mut self) -> Propagation {
        self.input.detach(SessionKind::Resize);

        if self.resize.end().is_some() {
            debug!(
                width = self.image_size.width,
                height = self.image_size.height,
                "resize ended"
            );
            let Size { width, height } = self.image_size;
            if let Err(e) = self.resize_image_canvas(width, height) {
                warn!(error = %e, "failed to re-render resized image");
            }
        }
        Propagation::PreventDefault
    }

    /// Release ending a move.
    pub fn end_move(&mut self) -> Propagation {
        self.input.detach(SessionKind::Move);
        if self.movement.end().is_some() {
            debug!("move ended");
        }
        Propagation::PreventDefault
    }

    /// Position the container at an absolute page position.
    pub fn set_offset(&mut self, offset: Point) {
        let parent = self.absolute_box(Element::Parent);
        self.layout
            .set_position(Element::Container, offset - parent.origin());
    }

    /// Set the displayed size of the image without touching its pixels.
    pub fn resize_image(&mut self, width: f64, height: f64) {
        self.image_size = Size::new(width, height);
        self.layout.set_size(Element::Source, self.image_size);
    }

    /// Re-render the backing raster at the given size.
    ///
    /// Always resamples the original, never the current raster, so repeated
    /// resizes do not stack resampling and compression loss.
    ///
    /// # Errors
    ///
    /// Returns `CropperError::InvalidSize` if the size rounds to zero pixels,
    /// or the underlying resample/encode error.
    pub fn resize_image_canvas(&mut self, width: f64, height: f64) -> Result<(), CropperError> {
        let (px_width, px_height) = Size::new(width, height).to_pixels();
        if px_width == 0 || px_height == 0 {
            return Err(CropperError::InvalidSize { width, height });
        }

        let rendered = resize(&self.original, px_width, px_height, self.options.filter)?;
        let encoded = encode(&rendered, self.options.output)?;
        self.source = decode_image(&encoded.bytes)?;
        self.layout.set_image_source(&encoded);

        debug!(
            width = px_width,
            height = px_height,
            bytes = encoded.bytes.len(),
            "re-rendered source image"
        );
        Ok(())
    }

    /// The region under the overlay, in displayed-image coordinates.
    pub fn crop_rect(&self) -> Rect {
        crop_rect(
            &self.layout.bounding_box(Element::Overlay),
            &self.layout.bounding_box(Element::Container),
            self.layout.scroll(),
        )
    }

    /// Extract the region under the overlay as a raster.
    pub fn crop_image(&self) -> Result<DecodedImage, CropperError> {
        extract_region(&self.source, self.image_size, &self.crop_rect())
    }

    /// Extract and encode the region under the overlay.
    pub fn crop(&self) -> Result<EncodedImage, CropperError> {
        let region = self.crop_image()?;
        let encoded = encode(&region, self.options.output)?;
        debug!(
            width = encoded.width,
            height = encoded.height,
            "cropped image"
        );
        Ok(encoded)
    }

    fn start(&mut self, kind: SessionKind, event: &InputEvent) -> Propagation {
        let container = self.absolute_box(Element::Container);
        let Some(state) = SessionState::capture(event, container) else {
            debug!(?kind, "press without a position ignored");
            return Propagation::Ignore;
        };

        let session = match kind {
            SessionKind::Resize => &mut self.resize,
            SessionKind::Move => &mut self.movement,
        };
        if session.begin(state) {
            self.input.attach(kind);
        }

        debug!(?kind, x = container.left, y = container.top, "drag started");
        Propagation::Consume
    }

    fn apply(&mut self, transform: Transform) {
        if transform.is_noop() {
            return;
        }
        if let Some(size) = transform.size {
            self.resize_image(size.width, size.height);
        }
        if let Some(offset) = transform.offset {
            self.set_offset(offset);
        }
    }

    fn tick_context(&self) -> TickContext {
        TickContext {
            aspect_ratio: self.aspect_ratio,
            constrain: self.constrain,
            bounds: self.options.bounds,
        }
    }

    /// Bounding box of `element` in page coordinates.
    fn absolute_box(&self, element: Element) -> Rect {
        self.layout
            .bounding_box(element)
            .translate(self.layout.scroll())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory host for controller tests.

    use super::*;

    /// A page where the container shrink-wraps the image and every position
    /// is stored in page coordinates.
    #[derive(Debug, Clone)]
    pub struct FakeLayout {
        pub scroll: Point,
        /// Parent's top-left corner in page coordinates.
        pub parent: Point,
        /// Container offset relative to the parent.
        pub container: Point,
        pub image: Size,
        /// Overlay in page coordinates.
        pub overlay: Rect,
        pub image_sources: Vec<EncodedImage>,
        /// Number of position and size writes.
        pub writes: usize,
    }

    impl FakeLayout {
        pub fn new(container: Point, image: Size) -> Self {
            Self {
                scroll: Point::default(),
                parent: Point::default(),
                container,
                image,
                overlay: Rect::new(0.0, 0.0, 10.0, 10.0),
                image_sources: Vec::new(),
                writes: 0,
            }
        }

        /// Container rectangle in page coordinates.
        pub fn container_page_rect(&self) -> Rect {
            let origin = self.parent + self.container;
            Rect::new(origin.x, origin.y, self.image.width, self.image.height)
        }
    }

    impl Layout for FakeLayout {
        fn bounding_box(&self, element: Element) -> Rect {
            let page = match element {
                Element::Source | Element::Container => self.container_page_rect(),
                Element::Parent => Rect::new(self.parent.x, self.parent.y, 1000.0, 1000.0),
                Element::Overlay => self.overlay,
            };
            page.translate(Point::new(-self.scroll.x, -self.scroll.y))
        }

        fn scroll(&self) -> Point {
            self.scroll
        }

        fn set_position(&mut self, element: Element, position: Point) {
            assert_eq!(element, Element::Container);
            self.container = position;
            self.writes += 1;
        }

        fn set_size(&mut self, element: Element, size: Size) {
            assert_eq!(element, Element::Source);
            self.image = size;
            self.writes += 1;
        }

        fn set_image_source(&mut self, image: &EncodedImage) {
            self.image_sources.push(image.clone());
        }
    }

    /// Records listener registrations.
    #[derive(Debug, Clone, Default)]
    pub struct FakeInput {
        pub attached: Vec<SessionKind>,
        pub attach_calls: usize,
        pub detach_calls: usize,
    }

    impl InputSource for FakeInput {
        fn attach(&mut self, kind: SessionKind) {
            assert!(
                !self.attached.contains(&kind),
                "listeners for {kind:?} attached twice"
            );
            self.attached.push(kind);
            self.attach_calls += 1;
        }

        fn detach(&mut self, kind: SessionKind) {
            self.attached.retain(|k| *k != kind);
            self.detach_calls += 1;
        }
    }

    /// An image whose pixel values encode their position.
    pub fn gradient_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x % 256) as u8);
                pixels.push((y % 256) as u8);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        DecodedImage::new(width, height, pixels)
    }
}
