//! Host visual-tree and environment traits.
//!
//! ## Usage
//!
//! A host embedding the interaction core implements [`HostElement`] for its
//! elements, [`ScrollSurface`] for its viewport, and [`Host`] for process
//! globals (screen metrics, timers, capability probes).

use std::{sync::Arc, time::Duration};

use crate::{
    event::{ListenerHandler, ListenerId, ListenerKind, ListenerOptions},
    passive::CapabilityError,
};

/// Stable identity of a host node or event target.
///
/// Identity comparisons (scroll-parent rebinding, containment checks) go
/// through `NodeId` instead of fat-pointer equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Computed overflow behavior of a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Content renders outside the element's box.
    #[default]
    Visible,
    /// Overflowing content is clipped without scrolling.
    Hidden,
    /// The element always scrolls.
    Scroll,
    /// The element scrolls when content overflows.
    Auto,
}

impl Overflow {
    /// Whether this overflow mode makes an element independently scrollable.
    pub fn is_scrollable(self) -> bool {
        matches!(self, Self::Scroll | Self::Auto)
    }
}

/// The computed style values the scroll-parent walk inspects.
///
/// `height` and `max_height` are resolved pixel values; `None` means the
/// property does not resolve to a length on this element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComputedStyle {
    /// Computed `overflow` shorthand.
    pub overflow: Overflow,
    /// Computed `overflow-y`.
    pub overflow_y: Overflow,
    /// Resolved `height` in pixels.
    pub height: Option<f32>,
    /// Resolved `max-height` in pixels.
    pub max_height: Option<f32>,
}

/// Anything listeners can be registered on.
pub trait EventTarget: Send + Sync {
    /// Stable identity of this target.
    fn id(&self) -> NodeId;

    /// Registers a handler for `kind` and returns its registration id.
    fn add_listener(
        &self,
        kind: ListenerKind,
        options: ListenerOptions,
        handler: ListenerHandler,
    ) -> ListenerId;

    /// Removes a previously registered handler.
    fn remove_listener(&self, id: ListenerId);
}

/// An event target that manages its own scroll offset: an element with
/// scrollable overflow, or the viewport.
pub trait ScrollSurface: EventTarget {
    /// Current vertical scroll offset in layout pixels.
    ///
    /// Hosts normalize root-element quirks behind this method. The value may
    /// be negative while native overscroll is rubber-banding.
    fn scroll_top(&self) -> f32;
}

/// An element in the host's containment tree.
pub trait HostElement: ScrollSurface {
    /// Containment parent, or `None` at the top of the tree.
    fn parent(&self) -> Option<Arc<dyn HostElement>>;

    /// Whether this element is the outermost body container, the boundary of
    /// the scroll-parent walk.
    fn is_body(&self) -> bool;

    /// Computed style snapshot for the scroll-parent predicate.
    fn computed_style(&self) -> ComputedStyle;

    /// Whether `node` is this element or one of its descendants.
    fn contains(&self, node: NodeId) -> bool;
}

/// Process-level host services.
pub trait Host: Send + Sync {
    /// The viewport, the fallback scroll surface when no element qualifies.
    fn viewport(&self) -> Arc<dyn ScrollSurface>;

    /// Screen height in layout pixels. A runtime constant; the resistance
    /// curve uses it as its fixed reference.
    fn screen_height(&self) -> f32;

    /// Schedules `callback` to run once after `delay`.
    ///
    /// Fire-and-forget: there is no cancellation. Callers guard against
    /// teardown on their side.
    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>);

    /// Probes whether listener registration honors an options object with a
    /// `passive` flag.
    ///
    /// Hosts without listener option objects return an error; the probe
    /// treats that as "unsupported".
    fn probe_passive_listeners(&self) -> Result<bool, CapabilityError>;
}
