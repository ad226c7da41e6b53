//! Drag sessions: the transient state of one in-progress resize or move.
//!
//! A session is `Idle` until a press starts it, then `Active` until the
//! matching release. While active it turns every move event into a
//! [`Transform`] using the geometry captured at press time, so the result of
//! a tick depends only on the press and the current event, never on earlier
//! ticks.
//!
//! Sessions do not talk to the host. Attaching document listeners, writing
//! styles and re-rendering the raster all belong to
//! [`ViewportController`](crate::viewport::ViewportController).

use tracing::trace;

use crate::geometry::{
    compute_move, compute_resize, compute_scale, two_finger_pair, Bounds, Direction, Point,
    Rect, Size,
};

/// Which of the two independent drag sessions an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Dragging a corner handle.
    Resize,
    /// Dragging the image itself (and pinching it on touch screens).
    Move,
}

/// What the host should do with the native event once a handler has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// Leave the event alone.
    #[default]
    Ignore,
    /// Cancel the browser's default action.
    PreventDefault,
    /// Cancel the default action and stop the event reaching parents.
    Consume,
}

/// A pointer or touch event, reduced to what the cropper reads from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputEvent {
    /// Mouse position in page coordinates, if this is a mouse event.
    pub pointer: Option<Point>,
    /// Active touch points in page coordinates.
    pub touches: Vec<Point>,
    /// Whether the aspect-lock modifier (shift) is held.
    pub shift_key: bool,
    /// Direction tag of the pressed handle, if the target carried one.
    pub direction: Option<Direction>,
}

impl InputEvent {
    /// A mouse event at `(x, y)`.
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            pointer: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    /// A touch event with the given touch points.
    pub fn touch(touches: Vec<Point>) -> Self {
        Self {
            touches,
            ..Default::default()
        }
    }

    pub fn with_shift(mut self, shift_key: bool) -> Self {
        self.shift_key = shift_key;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// The position this event points at: the mouse position, or the first
    /// touch point for touch events.
    pub fn position(&self) -> Option<Point> {
        self.pointer.or_else(|| self.touches.first().copied())
    }
}

/// Everything captured when a drag starts.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Handle direction of the press, if any.
    pub direction: Option<Direction>,
    /// Touch points at press time.
    pub touches: Vec<Point>,
    /// Container rectangle at press time, in page coordinates.
    pub container: Rect,
    /// Pointer position at press time, in page coordinates.
    pub pointer: Point,
}

impl SessionState {
    /// Capture the state of a press.
    ///
    /// Returns `None` if the event has no usable position.
    pub fn capture(event: &InputEvent, container: Rect) -> Option<Self> {
        let pointer = event.position()?;
        Some(Self {
            direction: event.direction,
            touches: event.touches.clone(),
            container,
            pointer,
        })
    }
}

/// Per-tick inputs that live outside the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    /// Original image `width / height`.
    pub aspect_ratio: f64,
    /// Persistent aspect-lock mode.
    pub constrain: bool,
    pub bounds: Bounds,
}

/// A transform command for the viewport.
///
/// `None` fields are left untouched; the default value is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    /// New displayed size of the source image.
    pub size: Option<Size>,
    /// New absolute page position of the container.
    pub offset: Option<Point>,
}

impl Transform {
    pub fn is_noop(&self) -> bool {
        self.size.is_none() && self.offset.is_none()
    }
}

/// One drag session.
#[derive(Debug, Clone)]
pub struct InteractionSession {
    kind: SessionKind,
    state: Option<SessionState>,
}

impl InteractionSession {
    pub fn new(kind: SessionKind) -> Self {
        Self { kind, state: None }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    /// Enter `Active` with a freshly captured press.
    ///
    /// A press while already active replaces the old state. Returns `true`
    /// if the session was idle before.
    pub fn begin(&mut self, state: SessionState) -> bool {
        self.state.replace(state).is_none()
    }

    /// Return to `Idle`, handing back the state of the finished drag.
    pub fn end(&mut self) -> Option<SessionState> {
        self.state.take()
    }

    /// Turn a move event into a transform command.
    ///
    /// Idle sessions and events without a position produce a no-op.
    pub fn tick(&self, event: &InputEvent, ctx: &TickContext) -> Transform {
        let (Some(state), Some(pointer)) = (self.state.as_ref(), event.position()) else {
            return Transform::default();
        };

        match self.kind {
            SessionKind::Resize => resize_tick(state, pointer, event.shift_key, ctx),
            SessionKind::Move => move_tick(state, pointer, &event.touches),
        }
    }
}

fn resize_tick(
    state: &SessionState,
    pointer: Point,
    shift_key: bool,
    ctx: &TickContext,
) -> Transform {
    let Some(direction) = state.direction else {
        return Transform::default();
    };

    // Modifier read from this event, not the press.
    let constrain = ctx.constrain || shift_key;

    match compute_resize(
        direction,
        pointer,
        &state.container,
        ctx.aspect_ratio,
        constrain,
        &ctx.bounds,
    ) {
        Some(geometry) => {
            let rect = geometry.rect();
            Transform {
                size: Some(rect.size()),
                offset: Some(rect.origin()),
            }
        }
        None => {
            trace!(%direction, x = pointer.x, y = pointer.y, "resize tick out of bounds");
            Transform::default()
        }
    }
}

fn move_tick(state: &SessionState, pointer: Point, touches: &[Point]) -> Transform {
    let offset = compute_move(pointer, state.pointer, &state.container);

    let size = match (two_finger_pair(&state.touches), two_finger_pair(touches)) {
        (Some(prior), Some(current)) => match compute_scale(prior, current) {
            Some(ratio) => Some(state.container.size().scale(ratio)),
            None => {
                trace!("pinch ignored: fingers started on the same point");
                None
            }
        },
        _ => None,
    };

    Transform {
        size,
        offset: Some(offset),
    }
}
