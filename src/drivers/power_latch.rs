//! Power-rail cutoff latch (TPL5110-style "DONE" input).
//!
//! The node runs from a rail switched by a nano-power timer.  Driving the
//! timer's DONE line high removes power until the next flow event or
//! timer period.  The line is held low from configuration until the idle
//! threshold is reached, then driven high exactly once.
//!
//! ## Dual-target design
//!
//! Generic over any `embedded_hal` output pin: an `esp_idf_hal`
//! `PinDriver` on the device, a recording fake on the host.

use embedded_hal::digital::{Error as _, OutputPin};
use log::{error, info};

use crate::app::ports::PowerOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchState {
    Armed,
    Engaged,
}

pub struct PowerLatch<P> {
    pin: P,
    state: LatchState,
}

impl<P: OutputPin> PowerLatch<P> {
    /// Wrap a DONE pin that is already configured as output, driven low.
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            state: LatchState::Armed,
        }
    }

    pub fn state(&self) -> LatchState {
        self.state
    }
}

impl<P: OutputPin> PowerOutput for PowerLatch<P> {
    fn cut_power(&mut self) {
        if self.state == LatchState::Engaged {
            return;
        }
        // Engaged even if the write fails.
        self.state = LatchState::Engaged;
        info!("power latch: driving DONE high");
        if let Err(e) = self.pin.set_high() {
            error!("power latch: DONE write failed ({:?})", e.kind());
        }
    }

    fn is_cut(&self) -> bool {
        self.state == LatchState::Engaged
    }
}
