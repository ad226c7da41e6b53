//! Conversion between DOM events and cropper input.
//!
//! DOM coordinates are viewport-relative (`clientX`/`clientY`); the cropper
//! works in page coordinates, so the current scroll offset is added here.

use cropper_core::geometry::{Direction, Point};
use cropper_core::session::{InputEvent, Propagation};
use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement, MouseEvent, TouchEvent};

/// Name of the `data-*` attribute carrying a handle's direction.
pub(crate) const DIRECTION_ATTRIBUTE: &str = "direction";

/// Reduce a DOM mouse or touch event to an [`InputEvent`].
pub(crate) fn input_event(event: &Event, scroll: Point) -> InputEvent {
    let mut input = if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        InputEvent::mouse(
            mouse.client_x() as f64 + scroll.x,
            mouse.client_y() as f64 + scroll.y,
        )
        .with_shift(mouse.shift_key())
    } else if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let list = touch.touches();
        let touches = (0..list.length())
            .filter_map(|i| list.item(i))
            .map(|t| page_point(t.client_x(), t.client_y(), scroll))
            .collect();
        InputEvent::touch(touches).with_shift(touch.shift_key())
    } else {
        InputEvent::default()
    };

    input.direction = target_direction(event);
    input
}

/// Carry out what a handler asked for.
pub(crate) fn apply_propagation(event: &Event, propagation: Propagation) {
    match propagation {
        Propagation::Ignore => {}
        Propagation::PreventDefault => event.prevent_default(),
        Propagation::Consume => {
            event.prevent_default();
            event.stop_propagation();
        }
    }
}

fn page_point(client_x: i32, client_y: i32, scroll: Point) -> Point {
    Point::new(client_x as f64 + scroll.x, client_y as f64 + scroll.y)
}

/// The `data-direction` tag of the event target, if present and valid.
fn target_direction(event: &Event) -> Option<Direction> {
    let target = event.target()?.dyn_into::<HtmlElement>().ok()?;
    parse_direction(target.dataset().get(DIRECTION_ATTRIBUTE))
}

pub(crate) fn parse_direction(tag: Option<String>) -> Option<Direction> {
    let tag = tag?;
    match tag.parse() {
        Ok(direction) => Some(direction),
        Err(e) => {
            warn!(error = %e, "ignoring handle with bad direction tag");
            None
        }
    }
}
