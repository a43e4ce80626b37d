//! What the node puts on air.
//!
//! - [`payload`]: the 7-byte BTHome service data block rendered from a
//!   [`DeviceState`](crate::fsm::DeviceState).
//! - [`packet`]: the full legacy advertising data (flags, name, service
//!   data) that carries it.

pub mod packet;
pub mod payload;

pub use packet::AdvertisingPacket;
pub use payload::{BroadcastPayload, encode};
