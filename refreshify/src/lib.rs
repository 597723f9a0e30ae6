//! Pull-to-refresh interaction core.
//!
//! # Usage
//!
//! Mount a [`PullToRefresh`] over the element wrapping your scrollable
//! content, feed every render pass through [`PullToRefresh::update`], and
//! translate [`PullToRefresh::render`] output into host boxes.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use refreshify::{PullStatus, PullToRefresh, PullToRefreshArgs};
//! use refreshify_platform::{Host, HostElement};
//!
//! fn mount(root: Arc<dyn HostElement>, host: Arc<dyn Host>) {
//!     let args = PullToRefreshArgs::new(
//!         || { /* start loading */ },
//!         |(status, percent)| match status {
//!             PullStatus::Refreshing => "loading...".to_owned(),
//!             PullStatus::CanRelease => "release to refresh".to_owned(),
//!             _ => format!("pull down {percent:.0}%"),
//!         },
//!     );
//!     let widget = PullToRefresh::mount(args, root, host).unwrap();
//!     let description = widget.render();
//!     // Turn `description` into host boxes.
//!     # let _ = description;
//! }
//! ```
//!
//! The caller owns the `refreshing` flag: the widget fires `on_refresh` and
//! waits for an update with `refreshing: true`, then one with
//! `refreshing: false` once the reload lands.
#![deny(missing_docs, clippy::unwrap_used)]

mod drag;
mod guard;
mod machine;
mod prop;
mod render;
mod scroll;

pub mod pull_refresh;

pub use drag::{DragHandler, DragRecognizer, DragSession};
pub use guard::ScrollParentGuard;
pub use machine::{ConfigError, PullConfig, PullMachine, PullState, PullStatus};
pub use prop::{Callback, CallbackWith};
pub use pull_refresh::{PullToRefresh, PullToRefreshArgs, PullToRefreshDefaults};
pub use render::{RenderDescription, Section, StyleMap};
pub use scroll::{ScrollParent, resolve_scroll_parent, scroll_offset};
