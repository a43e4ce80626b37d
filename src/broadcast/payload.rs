//! BTHome service data payload.
//!
//! ## Layout
//!
//! | Index | Value            | Meaning                                  |
//! |-------|------------------|------------------------------------------|
//! | 0..2  | `D2 FC`          | Service UUID 0xFCD2, little-endian       |
//! | 2     | `40`             | BTHome v2 device info, unencrypted       |
//! | 3     | `27`             | Object id: running (binary sensor)       |
//! | 4     | `00` / `01`      | Running value                            |
//! | 5     | `0F`             | Object id: generic boolean               |
//! | 6     | `00` / `01`      | Watchdog wake value                      |
//!
//! Only indices 4 and 6 ever change.

use crate::config::{
    BTHOME_DEVICE_INFO, BTHOME_GENERIC_BOOL_ID, BTHOME_RUNNING_ID, SERVICE_DATA_LEN, SERVICE_UUID,
};
use crate::fsm::DeviceState;

/// Index of the running value byte.
pub const IDX_RUNNING: usize = 4;
/// Index of the watchdog value byte.
pub const IDX_WATCHDOG: usize = 6;

/// The constant frame every payload starts from.
const TEMPLATE: [u8; SERVICE_DATA_LEN] = {
    let uuid = SERVICE_UUID.to_le_bytes();
    [
        uuid[0],
        uuid[1],
        BTHOME_DEVICE_INFO,
        BTHOME_RUNNING_ID,
        0x00,
        BTHOME_GENERIC_BOOL_ID,
        0x00,
    ]
};

/// One rendered service data block.  Built fresh each cycle and moved into
/// the broadcaster; never edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BroadcastPayload([u8; SERVICE_DATA_LEN]);

impl BroadcastPayload {
    /// Render a device state.
    pub const fn encode(state: &DeviceState) -> Self {
        let mut bytes = TEMPLATE;
        bytes[IDX_RUNNING] = state.running as u8;
        bytes[IDX_WATCHDOG] = state.watchdog_wake as u8;
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; SERVICE_DATA_LEN] {
        &self.0
    }

    /// The payload without its leading UUID, as BLE scanners report it.
    pub fn body(&self) -> &[u8] {
        &self.0[2..]
    }

    pub const fn running(&self) -> bool {
        self.0[IDX_RUNNING] != 0
    }

    pub const fn watchdog_wake(&self) -> bool {
        self.0[IDX_WATCHDOG] != 0
    }
}

/// Render a device state into a payload.
pub const fn encode(state: &DeviceState) -> BroadcastPayload {
    BroadcastPayload::encode(state)
}
