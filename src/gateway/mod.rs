//! Receiver-side decoding of the node's broadcast.
//!
//! A gateway scanning for the node gets the service data either with its
//! UUID stripped (most host BLE stacks key service data by UUID and hand
//! over the remaining 5 bytes) or as the raw 7-byte block.  Both forms
//! decode to a [`TapStatus`]; [`monitor::TapMonitor`] turns a stream of
//! statuses into the messages the gateway publishes.

pub mod monitor;

use core::fmt;

use crate::broadcast::payload::{IDX_RUNNING, IDX_WATCHDOG};
use crate::config::{BTHOME_DEVICE_INFO, BTHOME_GENERIC_BOOL_ID, BTHOME_RUNNING_ID, SERVICE_DATA_LEN, SERVICE_UUID};

/// What a single advertisement says about the tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TapStatus {
    Off,
    On,
    /// The node woke on its timer and has not seen flow since.
    Watchdog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Neither 5 (UUID stripped) nor 7 bytes.
    BadLength(usize),
    /// Service UUID is not BTHome's.
    WrongService(u16),
    /// A constant header byte differs (index into the 7-byte form).
    BadHeader { index: usize, found: u8 },
    /// A value byte is neither 0 nor 1.
    BadFlag { index: usize, found: u8 },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength(n) => write!(f, "service data length {n}, expected 5 or 7"),
            Self::WrongService(uuid) => write!(f, "service 0x{uuid:04X} is not BTHome"),
            Self::BadHeader { index, found } => {
                write!(f, "unexpected header byte 0x{found:02X} at {index}")
            }
            Self::BadFlag { index, found } => write!(f, "flag byte 0x{found:02X} at {index} is not 0/1"),
        }
    }
}

impl core::error::Error for DecodeError {}

impl TapStatus {
    /// Decode service data in either the 5-byte or the 7-byte form.
    pub fn from_service_data(data: &[u8]) -> Result<Self, DecodeError> {
        let mut full = [0u8; SERVICE_DATA_LEN];
        match data.len() {
            SERVICE_DATA_LEN => full.copy_from_slice(data),
            n if n == SERVICE_DATA_LEN - 2 => {
                full[..2].copy_from_slice(&SERVICE_UUID.to_le_bytes());
                full[2..].copy_from_slice(data);
            }
            n => return Err(DecodeError::BadLength(n)),
        }

        let uuid = u16::from_le_bytes([full[0], full[1]]);
        if uuid != SERVICE_UUID {
            return Err(DecodeError::WrongService(uuid));
        }
        for (index, expected) in [(2, BTHOME_DEVICE_INFO), (3, BTHOME_RUNNING_ID), (5, BTHOME_GENERIC_BOOL_ID)] {
            if full[index] != expected {
                return Err(DecodeError::BadHeader { index, found: full[index] });
            }
        }

        let running = flag(&full, IDX_RUNNING)?;
        let watchdog = flag(&full, IDX_WATCHDOG)?;
        Ok(if watchdog {
            Self::Watchdog
        } else if running {
            Self::On
        } else {
            Self::Off
        })
    }
}

fn flag(full: &[u8; SERVICE_DATA_LEN], index: usize) -> Result<bool, DecodeError> {
    match full[index] {
        0 => Ok(false),
        1 => Ok(true),
        found => Err(DecodeError::BadFlag { index, found }),
    }
}
