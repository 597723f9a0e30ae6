//! Pull-to-refresh container wired to a host.
//!
//! ## Usage
//!
//! Mount a [`PullToRefresh`] over the gesture root, push prop changes through
//! [`PullToRefresh::update`] on every render pass, and turn
//! [`PullToRefresh::render`] output into host boxes.

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use derive_setters::Setters;
use parking_lot::Mutex;
use refreshify_platform::{Host, HostElement, InputEvent, ListenerHandler, PassiveSupport};
use tracing::debug;

use crate::{
    drag::{DragBinding, DragRecognizer},
    guard::ScrollParentGuard,
    machine::{ConfigError, PullConfig, PullMachine, PullState, PullStatus},
    prop::{Callback, CallbackWith},
    render::{RenderDescription, RenderInput, StyleMap, describe},
    scroll::resolve_scroll_parent,
};

/// Library defaults for the pull interaction.
pub struct PullToRefreshDefaults;

impl PullToRefreshDefaults {
    /// Height of the status indicator area, px.
    pub const HEAD_HEIGHT: f32 = 50.0;
    /// Pull distance where progress starts counting, px.
    pub const START_DISTANCE: f32 = 30.0;
    /// Resistance coefficient applied to raw pull distance.
    pub const RESISTANCE: f32 = 0.6;
    /// Duration of programmatic snap animations, ms.
    pub const ANIMATION_DURATION: u32 = 300;
    /// How long the complete state lingers before resetting, ms.
    pub const COMPLETE_DELAY: u32 = 500;
    /// Class prefix of every rendered section.
    pub const PREFIX_CLASS: &'static str = "pull-to-refreshify";
}

/// Props of the pull-to-refresh container.
///
/// `C` is the caller's content type; the status renderer maps the current
/// status and pull percent to it. Geometry and timing fields are read once at
/// mount; `refreshing` and the presentation fields are live on every update.
#[derive(Clone, PartialEq, Setters)]
pub struct PullToRefreshArgs<C> {
    /// Whether a refresh is currently in progress. Owned by the caller.
    pub refreshing: bool,
    /// Height of the status indicator area, px.
    pub head_height: f32,
    /// Pull distance where progress starts counting, px.
    pub start_distance: f32,
    /// Pull distance past `start_distance` that arms the release, px.
    /// Defaults to `head_height` when unset.
    #[setters(strip_option)]
    pub threshold: Option<f32>,
    /// Resistance coefficient in (0, 1].
    pub resistance: f32,
    /// Duration of programmatic snap animations, ms.
    pub animation_duration: u32,
    /// How long the complete state lingers before resetting, ms.
    pub complete_delay: u32,
    /// Ignore all drag input.
    pub disabled: bool,
    /// Class prefix of every rendered section.
    pub prefix_class: String,
    /// Extra class appended to the root section.
    #[setters(strip_option)]
    pub class_name: Option<String>,
    /// Inline style merged over the root section's defaults.
    #[setters(strip_option)]
    pub style: Option<StyleMap>,
    /// Callback fired when a release arms a refresh.
    #[setters(skip)]
    pub on_refresh: Callback,
    /// Renders the indicator content for a status and pull percent.
    #[setters(skip)]
    pub render_text: CallbackWith<(PullStatus, f32), C>,
    /// Content rendered inside the body wrapper.
    #[setters(skip)]
    pub children: Option<C>,
}

impl<C> PullToRefreshArgs<C> {
    /// Creates arguments with the required refresh callback and status
    /// renderer.
    pub fn new<F, R>(on_refresh: F, render_text: R) -> Self
    where
        F: Fn() + Send + Sync + 'static,
        R: Fn((PullStatus, f32)) -> C + Send + Sync + 'static,
    {
        Self {
            refreshing: false,
            head_height: PullToRefreshDefaults::HEAD_HEIGHT,
            start_distance: PullToRefreshDefaults::START_DISTANCE,
            threshold: None,
            resistance: PullToRefreshDefaults::RESISTANCE,
            animation_duration: PullToRefreshDefaults::ANIMATION_DURATION,
            complete_delay: PullToRefreshDefaults::COMPLETE_DELAY,
            disabled: false,
            prefix_class: PullToRefreshDefaults::PREFIX_CLASS.to_owned(),
            class_name: None,
            style: None,
            on_refresh: Callback::new(on_refresh),
            render_text: CallbackWith::new(render_text),
            children: None,
        }
    }

    /// Sets the content rendered inside the body wrapper.
    pub fn children(mut self, children: C) -> Self {
        self.children = Some(children);
        self
    }

    fn config(&self) -> PullConfig {
        PullConfig {
            head_height: self.head_height,
            start_distance: self.start_distance,
            threshold: self.threshold.unwrap_or(self.head_height),
            resistance: self.resistance,
            animation_duration: self.animation_duration,
            complete_delay: self.complete_delay,
            disabled: self.disabled,
        }
    }
}

struct Inner<C> {
    args: PullToRefreshArgs<C>,
    machine: PullMachine,
    drag: DragRecognizer,
    drag_binding: Option<DragBinding>,
    guard: Option<ScrollParentGuard>,
    gesture_root: Arc<dyn HostElement>,
    host: Arc<dyn Host>,
    passive: PassiveSupport,
    unmounted: bool,
    weak: Weak<Mutex<Inner<C>>>,
}

impl<C: Send + 'static> Inner<C> {
    /// Routes one input event into the recognizer and machine. Returns the
    /// refresh callback when the event armed a refresh; the caller fires it
    /// after releasing the lock.
    fn handle_input(&mut self, event: &mut InputEvent) -> Option<Callback> {
        let Self { drag, machine, .. } = self;
        drag.handle(event, machine);
        if self.machine.take_refresh_request() {
            self.machine.on_refresh().cloned()
        } else {
            None
        }
    }

    /// Re-resolves the scroll parent and rebinds the guard when its identity
    /// changed since the last pass.
    fn reconcile_scroll_parent(&mut self) {
        let resolved = resolve_scroll_parent(&self.gesture_root, self.host.as_ref());
        let bound = self.guard.as_ref().map(ScrollParentGuard::parent_id);
        if bound == Some(resolved.id()) {
            return;
        }
        debug!(parent = resolved.id().0, "scroll parent changed, rebinding");
        self.guard = Some(ScrollParentGuard::bind(
            resolved.clone(),
            Arc::clone(&self.gesture_root),
            self.passive.listener_options(),
        ));
        self.machine.set_scroll_parent(resolved);
    }

    fn schedule_reset(&self) {
        let weak = Weak::clone(&self.weak);
        let delay = Duration::from_millis(u64::from(self.machine.config().complete_delay));
        self.host.schedule(
            delay,
            Box::new(move || {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let mut inner = inner.lock();
                if inner.unmounted {
                    return;
                }
                inner.machine.finish_complete();
            }),
        );
    }
}

/// A mounted pull-to-refresh container.
///
/// Handles are cheap clones of one shared interaction; dropping the last one
/// removes every listener the mount registered.
pub struct PullToRefresh<C> {
    inner: Arc<Mutex<Inner<C>>>,
}

impl<C> Clone for PullToRefresh<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Send + 'static> PullToRefresh<C> {
    /// Mounts the interaction over `gesture_root`.
    ///
    /// Resolves the scroll parent, probes passive-listener support, and binds
    /// the drag and guard listeners. When `args.refreshing` is already true
    /// the widget starts in the refreshing state without an entry animation.
    pub fn mount(
        args: PullToRefreshArgs<C>,
        gesture_root: Arc<dyn HostElement>,
        host: Arc<dyn Host>,
    ) -> Result<Self, ConfigError> {
        let config = args.config();
        config.validate()?;

        let passive = PassiveSupport::probe(host.as_ref());
        let scroll_parent = resolve_scroll_parent(&gesture_root, host.as_ref());
        let machine = PullMachine::new(
            config,
            Some(args.on_refresh.clone()),
            scroll_parent,
            host.screen_height(),
            passive,
            args.refreshing,
        );

        let inner = Arc::new_cyclic(|weak| {
            Mutex::new(Inner {
                args,
                machine,
                drag: DragRecognizer::new(),
                drag_binding: None,
                guard: None,
                gesture_root,
                host,
                passive,
                unmounted: false,
                weak: Weak::clone(weak),
            })
        });

        {
            let weak = Arc::downgrade(&inner);
            let handler = ListenerHandler::new(move |event: &mut InputEvent| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let fired = {
                    let mut inner = inner.lock();
                    if inner.unmounted {
                        return;
                    }
                    inner.handle_input(event)
                };
                if let Some(on_refresh) = fired {
                    on_refresh.call();
                }
            });

            let mut locked = inner.lock();
            locked.drag_binding = Some(DragBinding::bind(
                Arc::clone(&locked.gesture_root),
                passive.listener_options(),
                handler,
            ));
            locked.reconcile_scroll_parent();
        }

        Ok(Self { inner })
    }

    /// Applies a render pass: re-resolves the scroll parent, picks up
    /// presentation props, and reconciles the caller-owned refreshing flag.
    ///
    /// Geometry and timing stay fixed at their mount values.
    pub fn update(&self, args: PullToRefreshArgs<C>) {
        let mut inner = self.inner.lock();
        if inner.unmounted {
            return;
        }
        inner.reconcile_scroll_parent();
        inner
            .machine
            .set_on_refresh(Some(args.on_refresh.clone()));
        let refreshing = args.refreshing;
        inner.args = args;
        inner.machine.sync_refreshing(refreshing);
        if inner.machine.take_reset_request() {
            inner.schedule_reset();
        }
    }

    /// Current renderable state.
    pub fn state(&self) -> PullState {
        self.inner.lock().machine.state()
    }

    /// Current status.
    pub fn status(&self) -> PullStatus {
        self.inner.lock().machine.status()
    }

    /// Pull progress for presentation, saturating at 100.
    pub fn percent(&self) -> f32 {
        self.inner.lock().machine.percent()
    }

    /// Produces the declarative render output for the current frame.
    ///
    /// The status renderer runs outside the interaction lock.
    pub fn render(&self) -> RenderDescription<C>
    where
        C: Clone,
    {
        let (render_text, children, prefix, class_name, style, head_height, state, percent) = {
            let inner = self.inner.lock();
            (
                inner.args.render_text.clone(),
                inner.args.children.clone(),
                inner.args.prefix_class.clone(),
                inner.args.class_name.clone(),
                inner.args.style.clone(),
                inner.machine.config().head_height,
                inner.machine.state(),
                inner.machine.percent(),
            )
        };
        let indicator = render_text.call((state.status, percent));
        describe(
            RenderInput {
                prefix: &prefix,
                class_name: class_name.as_deref(),
                style: style.as_ref(),
                head_height,
                offset_y: state.offset_y,
                duration: state.duration,
            },
            indicator,
            children,
        )
    }

    /// Tears the interaction down: removes every registered listener and
    /// disarms pending reset timers.
    pub fn unmount(&self) {
        let mut inner = self.inner.lock();
        inner.unmounted = true;
        if let Some(mut binding) = inner.drag_binding.take() {
            binding.unbind();
        }
        if let Some(mut guard) = inner.guard.take() {
            guard.unbind();
        }
    }
}
