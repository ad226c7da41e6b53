//! Document-level move/release listeners.
//!
//! Each session kind gets one move closure (registered for `mousemove` and
//! `touchmove`) and one release closure (`mouseup` and `touchend`). The
//! closures are created once and live as long as the cropper; attaching and
//! detaching only adds or removes the DOM registrations, so a release handler
//! can safely detach itself while it runs.

use std::cell::RefCell;
use std::rc::Weak;

use cropper_core::session::SessionKind;
use cropper_core::viewport::{InputSource, Layout};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget};

use crate::cropper::Controller;
use crate::event::{apply_propagation, input_event};

const MOVE_EVENTS: [&str; 2] = ["mousemove", "touchmove"];
const END_EVENTS: [&str; 2] = ["mouseup", "touchend"];

type Handler = Closure<dyn FnMut(Event)>;

/// Move and release handlers for one session kind.
struct HandlerPair {
    on_move: Handler,
    on_end: Handler,
    attached: bool,
}

impl HandlerPair {
    fn new(controller: &Weak<RefCell<Controller>>, kind: SessionKind) -> Self {
        Self {
            on_move: handler(controller.clone(), kind, Phase::Move),
            on_end: handler(controller.clone(), kind, Phase::End),
            attached: false,
        }
    }

    fn registrations(&self) -> impl Iterator<Item = (&'static str, &Handler)> + '_ {
        MOVE_EVENTS
            .into_iter()
            .map(move |name| (name, &self.on_move))
            .chain(END_EVENTS.into_iter().map(move |name| (name, &self.on_end)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Move,
    End,
}

/// [`InputSource`] that registers handlers on the document.
pub(crate) struct DocumentListeners {
    document: Document,
    resize: Option<HandlerPair>,
    movement: Option<HandlerPair>,
}

impl DocumentListeners {
    pub(crate) fn new(document: Document) -> Self {
        Self {
            document,
            resize: None,
            movement: None,
        }
    }

    /// Create the handlers. Must be called once the controller is shared.
    pub(crate) fn install(&mut self, controller: Weak<RefCell<Controller>>) {
        self.resize = Some(HandlerPair::new(&controller, SessionKind::Resize));
        self.movement = Some(HandlerPair::new(&controller, SessionKind::Move));
    }

    fn pair_mut(&mut self, kind: SessionKind) -> Option<&mut HandlerPair> {
        match kind {
            SessionKind::Resize => self.resize.as_mut(),
            SessionKind::Move => self.movement.as_mut(),
        }
    }
}

impl InputSource for DocumentListeners {
    fn attach(&mut self, kind: SessionKind) {
        let target: EventTarget = self.document.clone().into();
        let Some(pair) = self.pair_mut(kind) else {
            warn!(?kind, "listeners attached before install");
            return;
        };
        if pair.attached {
            return;
        }

        // touchmove must not be passive, or preventDefault cannot stop scrolling
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        for (name, handler) in pair.registrations() {
            let result = target.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                handler.as_ref().unchecked_ref(),
                &options,
            );
            if let Err(e) = result {
                warn!(?kind, name, error = ?e, "failed to add listener");
            }
        }
        pair.attached = true;
    }

    fn detach(&mut self, kind: SessionKind) {
        let target: EventTarget = self.document.clone().into();
        let Some(pair) = self.pair_mut(kind) else {
            return;
        };
        if !pair.attached {
            return;
        }

        for (name, handler) in pair.registrations() {
            let result =
                target.remove_event_listener_with_callback(name, handler.as_ref().unchecked_ref());
            if let Err(e) = result {
                warn!(?kind, name, error = ?e, "failed to remove listener");
            }
        }
        pair.attached = false;
    }
}

impl Drop for DocumentListeners {
    fn drop(&mut self) {
        self.detach(SessionKind::Resize);
        self.detach(SessionKind::Move);
    }
}

fn handler(controller: Weak<RefCell<Controller>>, kind: SessionKind, phase: Phase) -> Handler {
    Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(shared) = controller.upgrade() else {
            return;
        };
        let Ok(mut cropper) = shared.try_borrow_mut() else {
            warn!(?kind, ?phase, "cropper busy, dropping event");
            return;
        };

        let propagation = match phase {
            Phase::Move => {
                let input = input_event(&event, cropper.layout().scroll());
                match kind {
                    SessionKind::Resize => cropper.resize_tick(&input),
                    SessionKind::Move => cropper.move_tick(&input),
                }
            }
            Phase::End => match kind {
                SessionKind::Resize => cropper.end_resize(),
                SessionKind::Move => cropper.end_move(),
            },
        };
        apply_propagation(&event, propagation);
    })
}
