//! Scroll metrics and scroll-parent resolution.
//!
//! ## Usage
//!
//! Resolve the gesture root's scroll parent once per render pass with
//! [`resolve_scroll_parent`] and read its offset through [`scroll_offset`].

use std::sync::Arc;

use refreshify_platform::{
    ComputedStyle, Host, HostElement, ListenerHandler, ListenerId, ListenerKind,
    ListenerOptions, NodeId, ScrollSurface,
};

/// The resolved scroll context of a gesture root: the nearest independently
/// scrollable element ancestor, or the viewport.
///
/// Never authoritative — callers re-resolve on every render pass and compare
/// ids to decide whether listeners must be rebound.
#[derive(Clone)]
pub enum ScrollParent {
    /// A scrollable element ancestor.
    Element(Arc<dyn HostElement>),
    /// The window/viewport fallback.
    Viewport(Arc<dyn ScrollSurface>),
}

impl ScrollParent {
    /// Stable identity of the underlying target, for rebind diffing.
    pub fn id(&self) -> NodeId {
        match self {
            Self::Element(element) => element.id(),
            Self::Viewport(surface) => surface.id(),
        }
    }

    /// Raw vertical scroll offset of the underlying target.
    pub fn scroll_top(&self) -> f32 {
        match self {
            Self::Element(element) => element.scroll_top(),
            Self::Viewport(surface) => surface.scroll_top(),
        }
    }

    /// Registers a listener on the underlying target.
    pub fn add_listener(
        &self,
        kind: ListenerKind,
        options: ListenerOptions,
        handler: ListenerHandler,
    ) -> ListenerId {
        match self {
            Self::Element(element) => element.add_listener(kind, options, handler),
            Self::Viewport(surface) => surface.add_listener(kind, options, handler),
        }
    }

    /// Removes a listener from the underlying target.
    pub fn remove_listener(&self, id: ListenerId) {
        match self {
            Self::Element(element) => element.remove_listener(id),
            Self::Viewport(surface) => surface.remove_listener(id),
        }
    }
}

/// Current scroll offset of `parent`, clamped at zero so native rubber-band
/// overscroll (negative offsets) still reads as "at top".
pub fn scroll_offset(parent: &ScrollParent) -> f32 {
    parent.scroll_top().max(0.0)
}

fn is_scroll_container(style: &ComputedStyle) -> bool {
    (style.overflow_y.is_scrollable() || style.overflow.is_scrollable())
        && (style.height.is_some_and(|height| height > 0.0)
            || style.max_height.is_some_and(|height| height > 0.0))
}

/// Walks the containment chain upward from `start` and returns the first
/// ancestor that is independently scrollable: computed `overflow-y` or
/// `overflow` in scroll/auto, and a positive resolved `height` or
/// `max-height`.
///
/// The walk stops at the outermost body container, which is never returned;
/// when no ancestor qualifies the viewport is the scroll context. Pure and
/// re-entrant; nothing is cached.
pub fn resolve_scroll_parent(start: &Arc<dyn HostElement>, host: &dyn Host) -> ScrollParent {
    let mut node = Arc::clone(start);
    while let Some(parent) = node.parent() {
        if parent.is_body() {
            break;
        }
        if is_scroll_container(&node.computed_style()) {
            return ScrollParent::Element(node);
        }
        node = parent;
    }
    ScrollParent::Viewport(host.viewport())
}

#[cfg(test)]
mod tests {
    use refreshify_platform::{
        EventTarget, Overflow,
        test::{TestElement, TestHost},
    };

    use super::*;

    fn scrollable_style() -> ComputedStyle {
        ComputedStyle {
            overflow_y: Overflow::Auto,
            height: Some(400.0),
            ..Default::default()
        }
    }

    #[test]
    fn finds_nearest_scrollable_ancestor() {
        let body = TestElement::body();
        let root = TestElement::with_parent(ComputedStyle::default(), &body);
        let outer = TestElement::with_parent(scrollable_style(), &root);
        let inner = TestElement::with_parent(ComputedStyle::default(), &outer);
        let content = TestElement::with_parent(ComputedStyle::default(), &inner);
        let host = TestHost::new();

        let parent = resolve_scroll_parent(&(content as Arc<dyn HostElement>), host.as_ref());
        assert_eq!(parent.id(), outer.id());
    }

    #[test]
    fn overflow_shorthand_also_qualifies() {
        let body = TestElement::body();
        let root = TestElement::with_parent(ComputedStyle::default(), &body);
        let style = ComputedStyle {
            overflow: Overflow::Scroll,
            max_height: Some(200.0),
            ..Default::default()
        };
        let pane = TestElement::with_parent(style, &root);
        let content = TestElement::with_parent(ComputedStyle::default(), &pane);
        let host = TestHost::new();

        let parent = resolve_scroll_parent(&(content as Arc<dyn HostElement>), host.as_ref());
        assert_eq!(parent.id(), pane.id());
    }

    #[test]
    fn scrollable_overflow_without_height_is_skipped() {
        let body = TestElement::body();
        let root = TestElement::with_parent(ComputedStyle::default(), &body);
        let style = ComputedStyle {
            overflow_y: Overflow::Scroll,
            ..Default::default()
        };
        let pane = TestElement::with_parent(style, &root);
        let content = TestElement::with_parent(ComputedStyle::default(), &pane);
        let host = TestHost::new();

        let parent = resolve_scroll_parent(&(content as Arc<dyn HostElement>), host.as_ref());
        assert_eq!(parent.id(), host.viewport().id());
    }

    #[test]
    fn falls_back_to_viewport_at_body_boundary() {
        let body = TestElement::body();
        let content = TestElement::with_parent(scrollable_style(), &body);
        let host = TestHost::new();

        // The only candidate's parent is the body, so the walk never
        // examines it.
        let parent = resolve_scroll_parent(&(content as Arc<dyn HostElement>), host.as_ref());
        assert_eq!(parent.id(), host.viewport().id());
    }

    #[test]
    fn overscroll_reads_as_top() {
        let body = TestElement::body();
        let root = TestElement::with_parent(ComputedStyle::default(), &body);
        let pane = TestElement::with_parent(scrollable_style(), &root);
        pane.set_scroll_top(-12.0);

        let parent = ScrollParent::Element(pane as Arc<dyn HostElement>);
        assert_eq!(scroll_offset(&parent), 0.0);
    }
}
