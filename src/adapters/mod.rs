//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                 |
//! |------------|--------------|-----------------------------|
//! | `ble`      | Broadcaster  | Bluedroid GAP advertising   |
//! | `log_sink` | EventSink    | Serial log output           |
//!
//! The flow switch and power latch adapters live in
//! [`sensors`](crate::sensors) and [`drivers`](crate::drivers).

pub mod ble;
pub mod log_sink;
