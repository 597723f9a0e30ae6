//! Unified input events and listener registration primitives.
//!
//! ## Usage
//!
//! Hosts translate their native touch and pointer streams into [`InputEvent`]
//! values and dispatch them to the handlers registered through
//! [`EventTarget`](crate::node::EventTarget). Gesture code never sees a raw
//! host event.

use std::sync::Arc;

use crate::node::NodeId;

/// Source device of a unified input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// A finger on a touch surface.
    Touch,
    /// A pointer device with a primary button (mouse, pen).
    Pointer,
}

/// Lifecycle phase of a unified input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    /// Touch start or primary-button press.
    Start,
    /// Touch or pointer movement.
    Move,
    /// Touch end or primary-button release.
    End,
    /// Host-initiated interruption of the input stream.
    Cancel,
}

/// A point in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A single touch or pointer event, normalized at the host boundary.
///
/// Touch events carry the first touch point's page coordinates and pointer
/// events carry client coordinates; both arrive here as a plain [`Point`].
/// `position` is `None` when the host reports an empty touch list, and
/// handlers are expected to ignore such events.
#[derive(Debug, Clone)]
pub struct InputEvent {
    /// Which device produced the event.
    pub source: InputSource,
    /// Where in the input stream this event falls.
    pub phase: InputPhase,
    /// Normalized event position, if the host reported one.
    pub position: Option<Point>,
    /// Identity of the original event target, when the host knows it.
    pub target: Option<NodeId>,
    /// Whether the host allows suppressing the native default action.
    pub cancelable: bool,
    default_prevented: bool,
}

impl InputEvent {
    /// Creates an event that is cancelable and has no target identity.
    pub fn new(source: InputSource, phase: InputPhase, position: Option<Point>) -> Self {
        Self {
            source,
            phase,
            position,
            target: None,
            cancelable: true,
            default_prevented: false,
        }
    }

    /// Sets the identity of the original event target.
    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets whether the native default action can be suppressed.
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Requests suppression of the native default action.
    ///
    /// Ignored when the event is not cancelable, matching host semantics.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Whether a handler requested suppression of the native default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Listener registration slots exposed by event targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// A finger lands on the target.
    TouchStart,
    /// A tracked finger moves.
    TouchMove,
    /// A tracked finger lifts.
    TouchEnd,
    /// The host aborts the touch stream.
    TouchCancel,
    /// The primary pointer button goes down over the target.
    PointerDown,
    /// The pointer moves.
    PointerMove,
    /// The primary pointer button is released.
    PointerUp,
}

/// Registration mode for a listener.
///
/// `NonPassive` registrations keep the right to call
/// [`InputEvent::prevent_default`]; hosts that register listeners passively
/// by default must honor it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListenerOptions {
    /// Whatever registration mode the host uses by default.
    #[default]
    Default,
    /// Explicitly non-passive registration.
    NonPassive,
}

/// Opaque id of a listener registration, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Stable, comparable handle for a registered event handler.
///
/// `ListenerHandler` compares by identity (`Arc::ptr_eq`) so targets can
/// store and deduplicate handlers without comparing closures.
#[derive(Clone)]
pub struct ListenerHandler {
    inner: Arc<dyn Fn(&mut InputEvent) + Send + Sync>,
}

impl ListenerHandler {
    /// Creates a handler from a closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut InputEvent) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(handler),
        }
    }

    /// Invokes the handler.
    pub fn call(&self, event: &mut InputEvent) {
        (self.inner)(event);
    }
}

impl PartialEq for ListenerHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ListenerHandler {}

impl std::fmt::Debug for ListenerHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prevent_default_requires_cancelable() {
        let mut event = InputEvent::new(InputSource::Touch, InputPhase::Move, None)
            .with_cancelable(false);
        event.prevent_default();
        assert!(!event.default_prevented());

        let mut event = InputEvent::new(InputSource::Touch, InputPhase::Move, None);
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn handlers_compare_by_identity() {
        let a = ListenerHandler::new(|_| {});
        let b = ListenerHandler::new(|_| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }
}
