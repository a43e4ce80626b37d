//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Node (domain)
//! ```
//!
//! Driven adapters (flow switch, power latch, BLE advertiser, event sinks)
//! implement these traits.  The [`Node`](super::service::Node) consumes
//! them via generics, so the domain core never touches hardware directly
//! and every port can be replaced by a deterministic fake in tests.
//!
//! The sleep primitive is not a port of its own: the poll loop takes any
//! `embedded_hal::delay::DelayNs`.

use crate::broadcast::BroadcastPayload;
use crate::error::{BroadcastError, InitError};
use crate::sensors::Sample;

// ───────────────────────────────────────────────────────────────
// Input sampler (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one read of the flow switch line per call.
///
/// Implementations hold no state between calls beyond the line itself;
/// a driver error is reported as [`Sample::Fault`].
pub trait InputSampler {
    fn sample(&mut self) -> Sample;
}

// ───────────────────────────────────────────────────────────────
// Power output (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: removes the node's own power rail.
pub trait PowerOutput {
    /// Drive the power-off line active.  Idempotent: calls after the first
    /// have no further effect.  Nothing after this call is guaranteed to
    /// run.
    fn cut_power(&mut self);

    /// Whether the power-off line has been driven.
    fn is_cut(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Broadcaster (driven adapter: domain → radio)
// ───────────────────────────────────────────────────────────────

/// The radio transport for the service data payload.
pub trait Broadcaster {
    /// Start advertising with the first payload.  Failure is fatal.
    fn start(&mut self, payload: BroadcastPayload) -> Result<(), InitError>;

    /// Replace the advertised payload.  On failure the previous payload
    /// stays on air; the caller retries with the next cycle's payload.
    fn push(&mut self, payload: BroadcastPayload) -> Result<(), BroadcastError>;

    /// Take the payload off air after a fatal error.  Idempotent; later
    /// pushes fail with `NotAdvertising`.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, test
/// recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
