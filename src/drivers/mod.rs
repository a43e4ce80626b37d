//! Actuator drivers.

pub mod power_latch;
