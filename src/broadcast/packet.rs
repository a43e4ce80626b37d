//! Legacy advertising data assembly.
//!
//! ```text
//! ┌──────────────┬────────────────────────────┬─────────────────────────────┐
//! │ 02 01 06     │ LL 09 <name…>              │ 08 16 D2 FC 40 27 rr 0F ww  │
//! │ flags        │ complete local name        │ 16-bit service data         │
//! └──────────────┴────────────────────────────┴─────────────────────────────┘
//! ```
//!
//! Flags and name are fixed for the life of the boot; only the service
//! data tail is re-rendered on update.

use heapless::Vec;

use super::payload::BroadcastPayload;
use crate::config::{MAX_ADV_DATA_LEN, SERVICE_DATA_LEN};
use crate::error::BroadcastError;

const AD_TYPE_FLAGS: u8 = 0x01;
const AD_TYPE_COMPLETE_NAME: u8 = 0x09;
const AD_TYPE_SERVICE_DATA_16: u8 = 0x16;

/// LE General Discoverable | BR/EDR Not Supported.
const FLAGS_GENERAL_NO_BREDR: u8 = 0x02 | 0x04;

/// Raw advertising data, ready for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisingPacket {
    data: Vec<u8, MAX_ADV_DATA_LEN>,
}

impl AdvertisingPacket {
    /// Assemble flags, `name` and `payload`.  Fails if they do not fit in
    /// 31 bytes.
    pub fn new(name: &str, payload: &BroadcastPayload) -> Result<Self, BroadcastError> {
        let mut data = Vec::new();
        push_ad(&mut data, AD_TYPE_FLAGS, &[FLAGS_GENERAL_NO_BREDR])?;
        push_ad(&mut data, AD_TYPE_COMPLETE_NAME, name.as_bytes())?;
        push_ad(&mut data, AD_TYPE_SERVICE_DATA_16, payload.as_bytes())?;
        Ok(Self { data })
    }

    /// Replace the service data with a new payload.
    pub fn set_payload(&mut self, payload: &BroadcastPayload) {
        let start = self.data.len() - SERVICE_DATA_LEN;
        self.data[start..].copy_from_slice(payload.as_bytes());
    }

    /// Copy of this packet carrying `payload`.
    pub fn with_payload(&self, payload: &BroadcastPayload) -> Self {
        let mut next = self.clone();
        next.set_payload(payload);
        next
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

fn push_ad(
    buf: &mut Vec<u8, MAX_ADV_DATA_LEN>,
    ad_type: u8,
    value: &[u8],
) -> Result<(), BroadcastError> {
    let len = u8::try_from(value.len() + 1).map_err(|_| BroadcastError::PacketTooLong)?;
    buf.push(len).map_err(|_| BroadcastError::PacketTooLong)?;
    buf.push(ad_type).map_err(|_| BroadcastError::PacketTooLong)?;
    buf.extend_from_slice(value).map_err(|_| BroadcastError::PacketTooLong)
}
