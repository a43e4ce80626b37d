//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production, stderr on the host
//! if a logger is installed).

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Booted { cause, state } => {
                info!(
                    "BOOT  | cause={:?} | running={} watchdog={}",
                    cause, state.running as u8, state.watchdog_wake as u8,
                );
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::BroadcastFailed(e) => {
                warn!("ADV   | update failed: {}", e);
            }
            AppEvent::PowerCut { idle_cycles } => {
                info!("POWER | cut after {} idle cycles", idle_cycles);
            }
            AppEvent::Halted(e) => {
                error!("FAULT | halted: {}", e);
            }
        }
    }
}
