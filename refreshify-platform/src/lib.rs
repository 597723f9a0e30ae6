//! Host-environment abstraction for the refreshify pull-to-refresh core.
//!
//! ## Usage
//!
//! A host embedding the interaction core implements the traits in
//! [`node`] and feeds normalized [`event::InputEvent`]s into the listeners
//! the core registers. The `testing` feature exposes an in-memory host for
//! driving the core in tests.
#![deny(missing_docs, clippy::unwrap_used)]

pub mod event;
pub mod node;
pub mod passive;
#[cfg(any(test, feature = "testing"))]
pub mod test;

pub use event::{
    InputEvent, InputPhase, InputSource, ListenerHandler, ListenerId, ListenerKind,
    ListenerOptions, Point,
};
pub use node::{ComputedStyle, EventTarget, Host, HostElement, NodeId, Overflow, ScrollSurface};
pub use passive::{CapabilityError, PassiveSupport};
