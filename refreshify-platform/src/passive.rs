//! Passive-listener capability detection.
//!
//! ## Usage
//!
//! Probe once at startup and inject the resulting [`PassiveSupport`] value
//! wherever gesture listeners are registered.

use thiserror::Error;
use tracing::debug;

use crate::{event::ListenerOptions, node::Host};

/// Error raised by hosts that cannot express listener option objects.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The host's listener registration API has no options parameter.
    #[error("listener options are not supported by this host: {0}")]
    ListenerOptionsUnsupported(String),
}

/// Process-wide passive-listener capability, probed once at startup.
///
/// Immutable by construction; there is no mutable global to race on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassiveSupport {
    supported: bool,
}

impl PassiveSupport {
    /// Probes the host for passive-listener support.
    ///
    /// A failed probe silently records `false`, the conservative default.
    pub fn probe(host: &dyn Host) -> Self {
        let supported = match host.probe_passive_listeners() {
            Ok(supported) => supported,
            Err(err) => {
                debug!("passive listener probe failed: {err}");
                false
            }
        };
        Self { supported }
    }

    /// Capability value known ahead of time; mainly for tests.
    pub const fn with_support(supported: bool) -> Self {
        Self { supported }
    }

    /// Whether the host supports passive listener registration.
    pub const fn is_supported(&self) -> bool {
        self.supported
    }

    /// Registration options for gesture listeners.
    ///
    /// Explicitly non-passive when passive registration is the host default,
    /// so gesture handlers keep the right to cancel native scrolling.
    pub const fn listener_options(&self) -> ListenerOptions {
        if self.supported {
            ListenerOptions::NonPassive
        } else {
            ListenerOptions::Default
        }
    }
}
