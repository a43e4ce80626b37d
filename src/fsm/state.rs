//! Device state and its read-only phase view.

use core::fmt;

/// What the node currently believes about the tap.  Copied out of the
/// tracker, never shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceState {
    /// Flow seen on the most recent sample.
    pub running: bool,
    /// This boot was a timer wake and no flow has been seen since.
    pub watchdog_wake: bool,
    /// Consecutive inactive samples since the last active one.
    pub idle_count: u8,
}

impl DeviceState {
    pub(super) const fn boot(watchdog_wake: bool) -> Self {
        Self {
            running: false,
            watchdog_wake,
            idle_count: 0,
        }
    }
}

/// Tracker phase, for logs and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running,
    Idle(u8),
    PoweredOff,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "Running"),
            Self::Idle(n) => write!(f, "Idle({n})"),
            Self::PoweredOff => write!(f, "PoweredOff"),
        }
    }
}
