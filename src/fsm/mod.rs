//! Activity state tracker.
//!
//! The core state machine of the node.  One flow switch sample per poll
//! cycle drives one transition:
//!
//! ```text
//!            Active                        Inactive (n+1 < threshold)
//!   ┌──────────────────┐              ┌─────────────────┐
//!   ▼                  │              ▼                 │
//! Running ──Inactive──▶ Idle(1) ──▶ … Idle(n) ──────────┘
//!   ▲                                  │
//!   └──────────── Active ──────────────┤
//!                                      │ Inactive (n+1 == threshold)
//!                                      ▼
//!                                  PoweredOff  (terminal)
//! ```
//!
//! The boot state is `Idle(0)` with the watchdog flag taken from the wake
//! classifier.  The flag clears on the first active sample and never
//! comes back within a boot.  Reaching `PoweredOff` asks for the power
//! rail to be cut exactly once; every later sample is ignored.

pub mod state;

use log::{debug, info};

use crate::config::IDLE_THRESHOLD;
use crate::error::SampleFault;
use crate::sensors::Sample;
use crate::sensors::wake::WakeCause;
pub use state::{DeviceState, Phase};

// ---------------------------------------------------------------------------
// Transition outcome
// ---------------------------------------------------------------------------

/// Result of feeding one sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State updated; broadcast it and keep polling.
    Updated(DeviceState),
    /// Idle threshold reached on this sample: broadcast the state, then cut
    /// power.  Produced once per boot.
    PowerOff(DeviceState),
    /// Already powered off; the sample was ignored.
    Halted,
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Owns the [`DeviceState`] and is the only thing that mutates it.
#[derive(Debug)]
pub struct StateTracker {
    state: DeviceState,
    threshold: u8,
    powered_off: bool,
}

impl StateTracker {
    /// Boot state from the wake classification.
    pub fn new(wake: WakeCause) -> Self {
        Self::with_threshold(wake, IDLE_THRESHOLD)
    }

    /// Boot state with a non-default idle threshold.  Zero is treated as 1.
    pub fn with_threshold(wake: WakeCause, threshold: u8) -> Self {
        Self {
            state: DeviceState::boot(wake.is_watchdog()),
            threshold: threshold.max(1),
            powered_off: false,
        }
    }

    /// Copy of the current state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        if self.powered_off {
            Phase::PoweredOff
        } else if self.state.running {
            Phase::Running
        } else {
            Phase::Idle(self.state.idle_count)
        }
    }

    pub fn is_powered_off(&self) -> bool {
        self.powered_off
    }

    /// Apply one sample.  A fault is returned as an error and leaves the
    /// state untouched; the caller must stop polling.
    pub fn step(&mut self, sample: Sample) -> Result<Transition, SampleFault> {
        if self.powered_off {
            return Ok(Transition::Halted);
        }

        if sample.checked()?.is_active() {
            if !self.state.running {
                info!("tracker: flow started after {} idle cycles", self.state.idle_count);
            }
            self.state.running = true;
            self.state.watchdog_wake = false;
            self.state.idle_count = 0;
        } else {
            if self.state.running {
                info!("tracker: flow stopped");
            }
            self.state.running = false;
            self.state.idle_count = self.state.idle_count.saturating_add(1);
            debug!("tracker: idle {}/{}", self.state.idle_count, self.threshold);

            if self.state.idle_count >= self.threshold {
                info!("tracker: idle threshold reached ({} cycles)", self.threshold);
                self.powered_off = true;
                return Ok(Transition::PowerOff(self.state));
            }
        }

        Ok(Transition::Updated(self.state))
    }
}
