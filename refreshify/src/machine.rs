//! The pull state machine.
//!
//! ## Usage
//!
//! Feed committed drag deltas in through the [`DragHandler`] impl and drive
//! the externally controlled refreshing flag through
//! [`PullMachine::sync_refreshing`]; read the renderable tuple back out of
//! [`PullMachine::state`] and [`PullMachine::percent`].

use refreshify_platform::{InputEvent, PassiveSupport};
use thiserror::Error;
use tracing::trace;

use crate::{
    drag::{DragHandler, DragSession},
    prop::Callback,
    scroll::{ScrollParent, scroll_offset},
};

/// Where a pull gesture currently stands.
///
/// The five statuses form a cycle: `Normal → Pulling → CanRelease →
/// Refreshing → Complete → Normal`, with `Pulling ↔ CanRelease` free to
/// oscillate while the finger is down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullStatus {
    /// At rest.
    Normal,
    /// Dragging below the release threshold.
    Pulling,
    /// Dragging at or above the release threshold.
    CanRelease,
    /// The refresh callback fired, or the caller set `refreshing`.
    Refreshing,
    /// The refresh finished; the widget is about to snap back.
    Complete,
}

impl PullStatus {
    /// Whether a refresh is underway or winding down, which blocks new
    /// drag input.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Refreshing | Self::Complete)
    }
}

/// The renderable offset/duration/status tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullState {
    /// Vertical displacement to render, always ≥ 0.
    pub offset_y: f32,
    /// Transition duration in milliseconds; 0 while tracking the finger.
    pub duration: u32,
    /// Current status.
    pub status: PullStatus,
}

/// Geometry and timing of the pull interaction, fixed at mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullConfig {
    /// Height of the status indicator area, px.
    pub head_height: f32,
    /// Pull distance where progress starts counting, px.
    pub start_distance: f32,
    /// Pull distance past `start_distance` that arms the release, px.
    pub threshold: f32,
    /// Resistance coefficient in (0, 1].
    pub resistance: f32,
    /// Duration of programmatic snaps, ms.
    pub animation_duration: u32,
    /// How long `Complete` lingers before resetting, ms.
    pub complete_delay: u32,
    /// Ignore all drag input.
    pub disabled: bool,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            head_height: 50.0,
            start_distance: 30.0,
            threshold: 50.0,
            resistance: 0.6,
            animation_duration: 300,
            complete_delay: 500,
            disabled: false,
        }
    }
}

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// `resistance` must dampen, not amplify.
    #[error("resistance must lie in (0, 1], got {0}")]
    ResistanceOutOfRange(f32),
    /// The indicator area needs a positive height.
    #[error("head_height must be positive, got {0}")]
    NonPositiveHeadHeight(f32),
}

impl PullConfig {
    /// Validates the configuration at mount time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.resistance > 0.0 && self.resistance <= 1.0) {
            return Err(ConfigError::ResistanceOutOfRange(self.resistance));
        }
        if self.head_height <= 0.0 {
            return Err(ConfigError::NonPositiveHeadHeight(self.head_height));
        }
        Ok(())
    }
}

/// Orchestrates drag deltas, the resistance curve, threshold comparison, and
/// the externally driven refreshing flag into a renderable [`PullState`].
///
/// One instance per mounted widget. The machine never schedules or fires
/// callbacks itself; it records requests that the coordinator takes and
/// executes outside its lock.
pub struct PullMachine {
    config: PullConfig,
    state: PullState,
    on_refresh: Option<Callback>,
    scroll_parent: ScrollParent,
    screen_height: f32,
    passive: PassiveSupport,
    last_refreshing: bool,
    refresh_requested: bool,
    reset_requested: bool,
}

impl PullMachine {
    /// Creates a machine for a freshly mounted widget.
    ///
    /// When `refreshing` is already true at mount, the state starts directly
    /// in `Refreshing` with zero duration, so nothing animates in from
    /// `Normal`.
    pub fn new(
        config: PullConfig,
        on_refresh: Option<Callback>,
        scroll_parent: ScrollParent,
        screen_height: f32,
        passive: PassiveSupport,
        refreshing: bool,
    ) -> Self {
        let state = if refreshing {
            PullState {
                offset_y: config.head_height,
                duration: 0,
                status: PullStatus::Refreshing,
            }
        } else {
            PullState {
                offset_y: 0.0,
                duration: 0,
                status: PullStatus::Normal,
            }
        };
        Self {
            config,
            state,
            on_refresh,
            scroll_parent,
            screen_height,
            passive,
            last_refreshing: refreshing,
            refresh_requested: false,
            reset_requested: false,
        }
    }

    /// Current renderable state.
    pub fn state(&self) -> PullState {
        self.state
    }

    /// Current status.
    pub fn status(&self) -> PullStatus {
        self.state.status
    }

    /// Mount-time configuration.
    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    /// The configured refresh callback.
    pub fn on_refresh(&self) -> Option<&Callback> {
        self.on_refresh.as_ref()
    }

    /// Points the veto check at a newly resolved scroll parent.
    pub fn set_scroll_parent(&mut self, parent: ScrollParent) {
        self.scroll_parent = parent;
    }

    /// Replaces the refresh callback, which may change identity between
    /// render passes.
    pub fn set_on_refresh(&mut self, on_refresh: Option<Callback>) {
        self.on_refresh = on_refresh;
    }

    /// Pull progress for presentation, saturating at 100.
    ///
    /// Zero until the offset reaches `start_distance`, then linear in the
    /// offset until `start_distance + threshold`.
    pub fn percent(&self) -> f32 {
        let PullConfig {
            start_distance,
            threshold,
            ..
        } = self.config;
        if threshold <= 0.0 {
            return 0.0;
        }
        let offset = self.state.offset_y;
        if offset < start_distance {
            return 0.0;
        }
        (offset - start_distance).min(threshold) * 100.0 / threshold
    }

    /// Reconciles the externally controlled refreshing flag.
    ///
    /// Only acts when the flag actually changed since the last observation;
    /// the mount-time value was already folded into the initial state.
    pub fn sync_refreshing(&mut self, refreshing: bool) {
        if refreshing == self.last_refreshing {
            return;
        }
        self.last_refreshing = refreshing;
        if refreshing {
            self.apply(PullStatus::Refreshing, 0.0);
        } else {
            self.apply(PullStatus::Complete, 0.0);
        }
    }

    /// Takes the pending request to fire the refresh callback.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    /// Takes the pending request to schedule the complete→normal reset.
    pub fn take_reset_request(&mut self) -> bool {
        std::mem::take(&mut self.reset_requested)
    }

    /// The reset timer elapsed.
    ///
    /// Guarded on still being in `Complete`: a refresh restarted inside the
    /// delay window must not be knocked back to `Normal`.
    pub fn finish_complete(&mut self) {
        if self.state.status == PullStatus::Complete {
            self.apply(PullStatus::Normal, 0.0);
        }
    }

    /// Elastic resistance: diminishing returns as the pull approaches the
    /// screen height.
    fn damped_offset(&self, raw: f32) -> f32 {
        raw * (1.0 - raw / self.screen_height) * self.config.resistance
    }

    fn apply(&mut self, status: PullStatus, drag_offset: f32) {
        self.state = match status {
            PullStatus::Pulling | PullStatus::CanRelease => PullState {
                offset_y: drag_offset,
                duration: 0,
                status,
            },
            PullStatus::Refreshing => PullState {
                offset_y: self.config.head_height,
                duration: self.config.animation_duration,
                status,
            },
            PullStatus::Complete => {
                self.reset_requested = true;
                PullState {
                    offset_y: self.config.head_height,
                    duration: self.config.animation_duration,
                    status,
                }
            }
            // Everything else decays to a neutral render.
            PullStatus::Normal => PullState {
                offset_y: 0.0,
                duration: self.config.animation_duration,
                status,
            },
        };
        trace!(status = ?status, offset_y = self.state.offset_y, "pull state");
    }
}

impl DragHandler for PullMachine {
    fn on_drag_move(&mut self, event: &mut InputEvent, candidate: &DragSession) -> bool {
        let raw = candidate.offset_y;
        let vetoed = self.on_refresh.is_none()
            || raw <= 0.0
            || scroll_offset(&self.scroll_parent) != 0.0
            || self.state.status.is_busy()
            || self.config.disabled;
        if vetoed {
            // Leave the native default alone so the host can scroll.
            return false;
        }

        // Hosts without passive-listener support deliver at most one
        // touchmove unless the default is suppressed here (historical
        // low-end Android behavior); capable hosts are covered by the
        // scroll-parent guard instead.
        if !self.passive.is_supported() && event.cancelable {
            event.prevent_default();
        }

        let offset = self.damped_offset(raw);
        let status = if offset - self.config.start_distance < self.config.threshold {
            PullStatus::Pulling
        } else {
            PullStatus::CanRelease
        };
        self.apply(status, offset);
        true
    }

    fn on_drag_end(&mut self, _event: &mut InputEvent, session: &DragSession) {
        // No committed offset means the gesture never took; nothing to undo.
        if session.offset_y == 0.0 {
            return;
        }
        match self.state.status {
            PullStatus::Pulling => self.apply(PullStatus::Normal, 0.0),
            PullStatus::CanRelease => {
                if self.on_refresh.is_some() {
                    self.refresh_requested = true;
                }
            }
            _ => {}
        }
    }
}
