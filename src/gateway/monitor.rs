//! Edge detection over decoded advertisements.
//!
//! The node re-advertises the same state every second, so the gateway
//! only publishes on change: tap turned on, tap turned off.  Watchdog
//! advertisements are published every time they are seen.

use serde::Serialize;

use super::TapStatus;

/// `tap_state` value published when flow starts.
pub const TAP_ON: &str = "tap on";
/// `tap_state` value published when flow stops.
pub const TAP_OFF: &str = "Water Off";

/// A message for the gateway's upstream topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TapMessage {
    /// `{"tap_state":"tap on"}` / `{"tap_state":"Water Off"}`
    TapState { tap_state: &'static str },
    /// `{"watchdog":1}`
    Watchdog { watchdog: u8 },
}

impl TapMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Remembers the last status seen from one node.
#[derive(Debug, Clone)]
pub struct TapMonitor {
    previous: TapStatus,
}

impl Default for TapMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl TapMonitor {
    /// Start assuming the tap is off.
    pub fn new() -> Self {
        Self {
            previous: TapStatus::Off,
        }
    }

    pub fn previous(&self) -> TapStatus {
        self.previous
    }

    /// Record `status` and return the message to publish, if any.
    pub fn observe(&mut self, status: TapStatus) -> Option<TapMessage> {
        let msg = match (self.previous, status) {
            (TapStatus::Off, TapStatus::On) => Some(TapMessage::TapState { tap_state: TAP_ON }),
            (TapStatus::On, TapStatus::Off) => Some(TapMessage::TapState { tap_state: TAP_OFF }),
            (_, TapStatus::Watchdog) => Some(TapMessage::Watchdog { watchdog: 1 }),
            _ => None,
        };
        self.previous = status;
        msg
    }
}
