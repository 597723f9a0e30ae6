//! Drag-gesture recognition over unified input events.
//!
//! ## Usage
//!
//! Bind the gesture root with [`DragBinding::bind`] and route every incoming
//! event through [`DragRecognizer::handle`] together with the consumer's
//! [`DragHandler`].

use std::sync::Arc;

use refreshify_platform::{
    HostElement, InputEvent, InputPhase, ListenerHandler, ListenerId, ListenerKind,
    ListenerOptions,
};
use smallvec::SmallVec;

/// Live measurements of a single drag gesture, in layout pixels.
///
/// Zeroed at session start and end; never persisted across gestures.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragSession {
    /// Horizontal position where the gesture started.
    pub start_x: f32,
    /// Vertical position where the gesture started.
    pub start_y: f32,
    /// Committed horizontal offset relative to the start.
    pub offset_x: f32,
    /// Committed vertical offset relative to the start.
    pub offset_y: f32,
}

/// Consumer of drag lifecycle notifications.
///
/// The default methods encode absent callbacks: moves are vetoed and
/// start/end are no-ops unless overridden.
pub trait DragHandler {
    /// A drag session began.
    fn on_drag_start(&mut self, _event: &mut InputEvent, _session: &DragSession) {}

    /// A move produced `candidate`. Returning `true` commits it as the new
    /// session state; returning `false` vetoes the move and keeps the
    /// previously committed session, start reference included.
    fn on_drag_move(&mut self, _event: &mut InputEvent, _candidate: &DragSession) -> bool {
        false
    }

    /// The drag session ended; `session` is the last committed state.
    fn on_drag_end(&mut self, _event: &mut InputEvent, _session: &DragSession) {}
}

/// Unifies single-touch and primary-button pointer input into one drag
/// session at a time.
#[derive(Debug, Default)]
pub struct DragRecognizer {
    session: DragSession,
    active: bool,
}

impl DragRecognizer {
    /// Creates an idle recognizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag session is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Routes one input event through the recognizer, notifying `handler`.
    ///
    /// Moves are only processed between a start and an end; duplicate or
    /// out-of-order end events reduce to an idempotent reset.
    pub fn handle(&mut self, event: &mut InputEvent, handler: &mut dyn DragHandler) {
        match event.phase {
            InputPhase::Start => self.start(event, handler),
            InputPhase::Move => self.update(event, handler),
            InputPhase::End | InputPhase::Cancel => self.finish(event, handler),
        }
    }

    fn start(&mut self, event: &mut InputEvent, handler: &mut dyn DragHandler) {
        // An empty touch list carries no start point; ignore it.
        let Some(position) = event.position else {
            return;
        };
        self.active = true;
        self.session = DragSession {
            start_x: position.x,
            start_y: position.y,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        handler.on_drag_start(event, &self.session);
    }

    fn update(&mut self, event: &mut InputEvent, handler: &mut dyn DragHandler) {
        if !self.active {
            return;
        }
        let Some(position) = event.position else {
            return;
        };
        let candidate = DragSession {
            offset_x: position.x - self.session.start_x,
            offset_y: position.y - self.session.start_y,
            ..self.session
        };
        if handler.on_drag_move(event, &candidate) {
            self.session = candidate;
        }
    }

    fn finish(&mut self, event: &mut InputEvent, handler: &mut dyn DragHandler) {
        self.active = false;
        handler.on_drag_end(event, &self.session);
        self.session = DragSession::default();
    }
}

/// The listener kinds a gesture root subscribes to.
const DRAG_LISTENER_KINDS: [ListenerKind; 7] = [
    ListenerKind::TouchStart,
    ListenerKind::TouchMove,
    ListenerKind::TouchEnd,
    ListenerKind::TouchCancel,
    ListenerKind::PointerDown,
    ListenerKind::PointerMove,
    ListenerKind::PointerUp,
];

/// Listener registrations tying a gesture root to its input handler.
///
/// Bound once per mounted widget; dropping the binding removes every
/// registered listener.
pub struct DragBinding {
    target: Arc<dyn HostElement>,
    ids: SmallVec<[ListenerId; 7]>,
}

impl DragBinding {
    /// Registers the full touch and pointer listener set on `target`.
    pub fn bind(
        target: Arc<dyn HostElement>,
        options: ListenerOptions,
        handler: ListenerHandler,
    ) -> Self {
        let ids = DRAG_LISTENER_KINDS
            .iter()
            .map(|kind| target.add_listener(*kind, options, handler.clone()))
            .collect();
        Self { target, ids }
    }

    /// Removes every listener this binding registered.
    pub fn unbind(&mut self) {
        for id in self.ids.drain(..) {
            self.target.remove_listener(id);
        }
    }
}

impl Drop for DragBinding {
    fn drop(&mut self) {
        self.unbind();
    }
}
