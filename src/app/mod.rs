//! Application core: pure domain logic, zero I/O.
//!
//! [`service::Node`] wires the wake classifier, state tracker, payload
//! encoder and power latch together.  All interaction with hardware
//! happens through the **port traits** in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
