//! Unified error types for the Flomon firmware.
//!
//! A single `Error` enum that every subsystem converts into, split by
//! failure policy: initialisation and sampling errors stop the device,
//! broadcast errors are logged and retried on the next poll cycle.
//! All variants are `Copy` so they pass through the poll loop and the
//! event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Radio stack or I/O line bring-up failed.
    Init(InitError),
    /// The flow switch line could not be read.
    Sample(SampleFault),
    /// The radio refused an advertising data update.
    Broadcast(BroadcastError),
}

impl Error {
    /// Fatal errors stop the node: no advertising, no further cycles.
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Broadcast(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(e) => write!(f, "init: {e}"),
            Self::Sample(e) => write!(f, "sample: {e}"),
            Self::Broadcast(e) => write!(f, "broadcast: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Initialisation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// BLE controller / host stack could not be enabled (driver return code).
    RadioEnable(i32),
    /// Advertising could not be configured or started (driver return code).
    AdvertisingStart(i32),
    /// A GPIO line could not be configured.
    GpioConfig(&'static str),
    /// A compile-time setting is unusable (e.g. the name overflows the
    /// advertising data).
    Config(&'static str),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RadioEnable(rc) => write!(f, "radio enable failed (rc={rc})"),
            Self::AdvertisingStart(rc) => write!(f, "advertising start failed (rc={rc})"),
            Self::GpioConfig(line) => write!(f, "GPIO config failed ({line})"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl From<InitError> for Error {
    fn from(e: InitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Sample faults
// ---------------------------------------------------------------------------

/// A read of the flow switch line failed.  There is exactly one kind:
/// the driver reported an error instead of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleFault;

impl fmt::Display for SampleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO read failed")
    }
}

impl From<SampleFault> for Error {
    fn from(e: SampleFault) -> Self {
        Self::Sample(e)
    }
}

// ---------------------------------------------------------------------------
// Broadcast errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastError {
    /// The radio stack rejected the advertising data update (driver return code).
    UpdateRejected(i32),
    /// Advertising has not been started yet.
    NotAdvertising,
    /// The assembled advertising data exceeds the 31-byte legacy limit.
    PacketTooLong,
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpdateRejected(rc) => write!(f, "advertising update rejected (rc={rc})"),
            Self::NotAdvertising => write!(f, "advertising not started"),
            Self::PacketTooLong => write!(f, "advertising data exceeds 31 bytes"),
        }
    }
}

impl From<BroadcastError> for Error {
    fn from(e: BroadcastError) -> Self {
        Self::Broadcast(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
