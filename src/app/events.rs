//! Outbound application events.
//!
//! The [`Node`](super::service::Node) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use crate::error::{BroadcastError, Error};
use crate::fsm::{DeviceState, Phase};
use crate::sensors::wake::WakeCause;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Wake classified and advertising started.
    Booted { cause: WakeCause, state: DeviceState },

    /// The tracker phase changed (idle counting within `Idle` is not a change).
    PhaseChanged { from: Phase, to: Phase },

    /// A payload update was refused; the previous payload stays on air.
    BroadcastFailed(BroadcastError),

    /// The power-off line was driven after `idle_cycles` inactive samples.
    PowerCut { idle_cycles: u8 },

    /// A fatal error stopped the node.
    Halted(Error),
}
