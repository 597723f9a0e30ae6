//! Native-overscroll suppression on the resolved scroll parent.
//!
//! ## Usage
//!
//! Bind a [`ScrollParentGuard`] to the resolved scroll parent and rebind it
//! whenever resolution yields a different target.

use std::sync::Arc;

use parking_lot::Mutex;
use refreshify_platform::{
    HostElement, InputEvent, ListenerHandler, ListenerId, ListenerKind, ListenerOptions, NodeId,
};
use smallvec::SmallVec;

use crate::scroll::{ScrollParent, scroll_offset};

/// Touch tracking shared between the guard's listener closures.
#[derive(Default)]
struct GuardState {
    start_y: f32,
}

/// Touch listeners on the scroll parent that suppress the browser-native
/// overscroll/rubber-band effect while the user drags down from the top of
/// content owned by the gesture root.
pub struct ScrollParentGuard {
    parent: ScrollParent,
    ids: SmallVec<[ListenerId; 4]>,
}

impl ScrollParentGuard {
    /// Binds guard listeners to `parent`, watching touches that land inside
    /// `root`.
    pub fn bind(
        parent: ScrollParent,
        root: Arc<dyn HostElement>,
        options: ListenerOptions,
    ) -> Self {
        let state = Arc::new(Mutex::new(GuardState::default()));
        let mut ids = SmallVec::new();

        {
            let state = Arc::clone(&state);
            ids.push(parent.add_listener(
                ListenerKind::TouchStart,
                options,
                ListenerHandler::new(move |event: &mut InputEvent| {
                    if let Some(position) = event.position {
                        state.lock().start_y = position.y;
                    }
                }),
            ));
        }

        {
            let state = Arc::clone(&state);
            let watched = parent.clone();
            ids.push(parent.add_listener(
                ListenerKind::TouchMove,
                options,
                ListenerHandler::new(move |event: &mut InputEvent| {
                    let Some(position) = event.position else {
                        return;
                    };
                    let downward = position.y - state.lock().start_y > 0.0;
                    let inside_root = event.target.is_some_and(|target| root.contains(target));
                    if downward
                        && event.cancelable
                        && scroll_offset(&watched) == 0.0
                        && inside_root
                    {
                        event.prevent_default();
                    }
                }),
            ));
        }

        for kind in [ListenerKind::TouchEnd, ListenerKind::TouchCancel] {
            let state = Arc::clone(&state);
            ids.push(parent.add_listener(
                kind,
                options,
                ListenerHandler::new(move |_event: &mut InputEvent| {
                    state.lock().start_y = 0.0;
                }),
            ));
        }

        Self { parent, ids }
    }

    /// Identity of the scroll parent this guard is bound to.
    pub fn parent_id(&self) -> NodeId {
        self.parent.id()
    }

    /// Removes every listener this guard registered.
    pub fn unbind(&mut self) {
        for id in self.ids.drain(..) {
            self.parent.remove_listener(id);
        }
    }
}

impl Drop for ScrollParentGuard {
    fn drop(&mut self) {
        self.unbind();
    }
}
