//! Flomon firmware library.
//!
//! A battery-powered tap flow node: sample a flow switch, advertise the
//! tap state as BTHome service data, and cut power after a run of idle
//! cycles.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, so the logic builds
//! and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod broadcast;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod gateway;
pub mod pins;
pub mod sensors;
