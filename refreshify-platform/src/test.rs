//! In-memory host for exercising the interaction core without a real UI
//! runtime.
//!
//! ## Usage
//!
//! Build an element tree with [`TestElement`], drive it with synthesized
//! [`InputEvent`]s, and control time through [`TestHost::fire_next`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

use crate::{
    event::{
        InputEvent, InputPhase, InputSource, ListenerHandler, ListenerId, ListenerKind,
        ListenerOptions, Point,
    },
    node::{ComputedStyle, EventTarget, Host, HostElement, NodeId, ScrollSurface},
    passive::CapabilityError,
};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Builds a touch event at a point.
pub fn touch(phase: InputPhase, x: f32, y: f32) -> InputEvent {
    InputEvent::new(InputSource::Touch, phase, Some(Point::new(x, y)))
}

/// Builds a pointer event at a point.
pub fn pointer(phase: InputPhase, x: f32, y: f32) -> InputEvent {
    InputEvent::new(InputSource::Pointer, phase, Some(Point::new(x, y)))
}

struct ListenerEntry {
    id: ListenerId,
    kind: ListenerKind,
    options: ListenerOptions,
    handler: ListenerHandler,
}

#[derive(Default)]
struct TargetState {
    listeners: Vec<ListenerEntry>,
    scroll_top: f32,
}

impl TargetState {
    fn add(&mut self, kind: ListenerKind, options: ListenerOptions, handler: ListenerHandler) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.listeners.push(ListenerEntry {
            id,
            kind,
            options,
            handler,
        });
        id
    }

    fn remove(&mut self, id: ListenerId) {
        self.listeners.retain(|entry| entry.id != id);
    }

    fn handlers_for(&self, kind: ListenerKind) -> Vec<ListenerHandler> {
        self.listeners
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.handler.clone())
            .collect()
    }
}

/// A plain scroll surface, standing in for the viewport.
pub struct TestSurface {
    id: NodeId,
    state: Mutex<TargetState>,
}

impl TestSurface {
    /// Creates a detached surface.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: next_node_id(),
            state: Mutex::new(TargetState::default()),
        })
    }

    /// Sets the surface's scroll offset.
    pub fn set_scroll_top(&self, value: f32) {
        self.state.lock().scroll_top = value;
    }

    /// Runs every handler registered for `kind` against `event`.
    pub fn dispatch(&self, kind: ListenerKind, event: &mut InputEvent) {
        let handlers = self.state.lock().handlers_for(kind);
        for handler in handlers {
            handler.call(event);
        }
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }
}

impl Default for TestSurface {
    fn default() -> Self {
        Self {
            id: next_node_id(),
            state: Mutex::new(TargetState::default()),
        }
    }
}

impl EventTarget for TestSurface {
    fn id(&self) -> NodeId {
        self.id
    }

    fn add_listener(
        &self,
        kind: ListenerKind,
        options: ListenerOptions,
        handler: ListenerHandler,
    ) -> ListenerId {
        self.state.lock().add(kind, options, handler)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.lock().remove(id);
    }
}

impl ScrollSurface for TestSurface {
    fn scroll_top(&self) -> f32 {
        self.state.lock().scroll_top
    }
}

/// An element in a synthetic containment tree.
pub struct TestElement {
    id: NodeId,
    body: bool,
    parent: Mutex<Option<Arc<TestElement>>>,
    descendants: Mutex<Vec<NodeId>>,
    style: Mutex<ComputedStyle>,
    state: Mutex<TargetState>,
}

impl TestElement {
    /// Creates a parentless element with the given style.
    pub fn new(style: ComputedStyle) -> Arc<Self> {
        Arc::new(Self {
            id: next_node_id(),
            body: false,
            parent: Mutex::new(None),
            descendants: Mutex::new(Vec::new()),
            style: Mutex::new(style),
            state: Mutex::new(TargetState::default()),
        })
    }

    /// The outermost body container; the scroll-parent walk never crosses it.
    pub fn body() -> Arc<Self> {
        Arc::new(Self {
            id: next_node_id(),
            body: true,
            parent: Mutex::new(None),
            descendants: Mutex::new(Vec::new()),
            style: Mutex::new(ComputedStyle::default()),
            state: Mutex::new(TargetState::default()),
        })
    }

    /// Creates an element as a child of `parent`.
    pub fn with_parent(style: ComputedStyle, parent: &Arc<TestElement>) -> Arc<Self> {
        let element = Self::new(style);
        *element.parent.lock() = Some(Arc::clone(parent));

        // Register the new node with every ancestor for containment checks.
        let mut ancestor = Some(Arc::clone(parent));
        while let Some(node) = ancestor {
            node.descendants.lock().push(element.id);
            ancestor = node.parent.lock().clone();
        }
        element
    }

    /// Sets the element's scroll offset.
    pub fn set_scroll_top(&self, value: f32) {
        self.state.lock().scroll_top = value;
    }

    /// Replaces the element's computed style.
    pub fn set_style(&self, style: ComputedStyle) {
        *self.style.lock() = style;
    }

    /// Runs every handler registered for `kind` against `event`.
    pub fn dispatch(&self, kind: ListenerKind, event: &mut InputEvent) {
        let handlers = self.state.lock().handlers_for(kind);
        for handler in handlers {
            handler.call(event);
        }
    }

    /// Number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Registration options of every listener bound for `kind`.
    pub fn listener_options(&self, kind: ListenerKind) -> Vec<ListenerOptions> {
        self.state
            .lock()
            .listeners
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.options)
            .collect()
    }
}

impl EventTarget for TestElement {
    fn id(&self) -> NodeId {
        self.id
    }

    fn add_listener(
        &self,
        kind: ListenerKind,
        options: ListenerOptions,
        handler: ListenerHandler,
    ) -> ListenerId {
        self.state.lock().add(kind, options, handler)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.lock().remove(id);
    }
}

impl ScrollSurface for TestElement {
    fn scroll_top(&self) -> f32 {
        self.state.lock().scroll_top
    }
}

impl HostElement for TestElement {
    fn parent(&self) -> Option<Arc<dyn HostElement>> {
        self.parent
            .lock()
            .clone()
            .map(|parent| parent as Arc<dyn HostElement>)
    }

    fn is_body(&self) -> bool {
        self.body
    }

    fn computed_style(&self) -> ComputedStyle {
        *self.style.lock()
    }

    fn contains(&self, node: NodeId) -> bool {
        self.id == node || self.descendants.lock().contains(&node)
    }
}

type ScheduledCallback = Box<dyn FnOnce() + Send>;

/// A host with a controllable clock and capability surface.
pub struct TestHost {
    viewport: Arc<TestSurface>,
    screen_height: Mutex<f32>,
    passive_support: Mutex<Option<bool>>,
    timers: Mutex<Vec<(Duration, ScheduledCallback)>>,
}

impl TestHost {
    /// Creates a host with an 800px screen and passive support enabled.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            viewport: TestSurface::new(),
            screen_height: Mutex::new(800.0),
            passive_support: Mutex::new(Some(true)),
            timers: Mutex::new(Vec::new()),
        })
    }

    /// The viewport surface, for adjusting its scroll offset in tests.
    pub fn viewport_surface(&self) -> Arc<TestSurface> {
        Arc::clone(&self.viewport)
    }

    /// Sets the reported screen height.
    pub fn set_screen_height(&self, height: f32) {
        *self.screen_height.lock() = height;
    }

    /// Sets the result of the next capability probe.
    pub fn set_passive_support(&self, supported: bool) {
        *self.passive_support.lock() = Some(supported);
    }

    /// Makes the next capability probe fail.
    pub fn fail_passive_probe(&self) {
        *self.passive_support.lock() = None;
    }

    /// Number of timers scheduled and not yet fired.
    pub fn scheduled(&self) -> usize {
        self.timers.lock().len()
    }

    /// Delay of the oldest pending timer.
    pub fn next_delay(&self) -> Option<Duration> {
        self.timers.lock().first().map(|(delay, _)| *delay)
    }

    /// Fires the oldest pending timer. Returns whether one was pending.
    pub fn fire_next(&self) -> bool {
        let timer = {
            let mut timers = self.timers.lock();
            if timers.is_empty() {
                None
            } else {
                Some(timers.remove(0))
            }
        };
        match timer {
            Some((_, callback)) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl Host for TestHost {
    fn viewport(&self) -> Arc<dyn ScrollSurface> {
        Arc::clone(&self.viewport) as Arc<dyn ScrollSurface>
    }

    fn screen_height(&self) -> f32 {
        *self.screen_height.lock()
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) {
        self.timers.lock().push((delay, callback));
    }

    fn probe_passive_listeners(&self) -> Result<bool, CapabilityError> {
        self.passive_support.lock().ok_or_else(|| {
            CapabilityError::ListenerOptionsUnsupported("no listener option objects".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reaches_registered_handlers() {
        let element = TestElement::new(ComputedStyle::default());
        let hits = Arc::new(AtomicU64::new(0));
        let hits_in_handler = Arc::clone(&hits);
        let id = element.add_listener(
            ListenerKind::TouchMove,
            ListenerOptions::NonPassive,
            ListenerHandler::new(move |_| {
                hits_in_handler.fetch_add(1, Ordering::Relaxed);
            }),
        );

        let mut event = touch(InputPhase::Move, 0.0, 10.0);
        element.dispatch(ListenerKind::TouchMove, &mut event);
        element.dispatch(ListenerKind::TouchStart, &mut event);
        assert_eq!(hits.load(Ordering::Relaxed), 1);

        element.remove_listener(id);
        element.dispatch(ListenerKind::TouchMove, &mut event);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
        assert_eq!(element.listener_count(), 0);
    }

    #[test]
    fn containment_tracks_nested_children() {
        let body = TestElement::body();
        let outer = TestElement::with_parent(ComputedStyle::default(), &body);
        let inner = TestElement::with_parent(ComputedStyle::default(), &outer);

        assert!(outer.contains(inner.id()));
        assert!(outer.contains(outer.id()));
        assert!(body.contains(inner.id()));
        assert!(!inner.contains(outer.id()));
    }

    #[test]
    fn timers_fire_in_schedule_order() {
        let host = TestHost::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in [1u32, 2] {
            let order = Arc::clone(&order);
            host.schedule(
                Duration::from_millis(label as u64 * 100),
                Box::new(move || order.lock().push(label)),
            );
        }

        assert_eq!(host.scheduled(), 2);
        assert_eq!(host.next_delay(), Some(Duration::from_millis(100)));
        assert!(host.fire_next());
        assert!(host.fire_next());
        assert!(!host.fire_next());
        assert_eq!(*order.lock(), vec![1, 2]);
    }
}
