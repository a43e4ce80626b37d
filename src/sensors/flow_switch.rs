//! Flow switch input driver.
//!
//! The tap's paddle switch closes while water flows and pulls the line
//! high.  This driver wraps any `embedded_hal` input pin: on the device
//! that is an `esp_idf_hal` `PinDriver` configured as input, on the host
//! a scripted fake.  A read error is reported as [`Sample::Fault`], never
//! guessed into a level.

use embedded_hal::digital::{Error as _, InputPin};
use log::error;

use super::Sample;
use crate::app::ports::InputSampler;

/// Flow switch on a single digital input line (active high).
pub struct FlowSwitch<P> {
    pin: P,
}

impl<P: InputPin> FlowSwitch<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: InputPin> InputSampler for FlowSwitch<P> {
    fn sample(&mut self) -> Sample {
        match self.pin.is_high() {
            Ok(high) => Sample::from_level(high),
            Err(e) => {
                error!("flow switch: read failed ({:?})", e.kind());
                Sample::Fault
            }
        }
    }
}
