//! Boot-time wake classification.
//!
//! The node sleeps with its power rail removed and is woken either by the
//! flow switch or by the power-management timer.  Right after boot we
//! take a short debounce window of samples: if none of them sees flow,
//! the wake is attributed to the timer and reported as a watchdog wake.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::Sample;
use crate::app::ports::InputSampler;
use crate::config::{DEBOUNCE_DELAY_MS, DEBOUNCE_SAMPLES};
use crate::error::SampleFault;

/// Why this boot happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeCause {
    /// Flow was observed during the debounce window.
    FlowEvent,
    /// No flow in the window: the power-management timer woke us.
    Watchdog,
}

impl WakeCause {
    pub const fn is_watchdog(self) -> bool {
        matches!(self, Self::Watchdog)
    }
}

/// Take the debounce window: [`DEBOUNCE_SAMPLES`] reads, each followed by
/// [`DEBOUNCE_DELAY_MS`].  Stops at the first fault.
pub fn sample_window(
    sampler: &mut impl InputSampler,
    delay: &mut impl DelayNs,
) -> Result<[Sample; DEBOUNCE_SAMPLES], SampleFault> {
    let mut window = [Sample::Inactive; DEBOUNCE_SAMPLES];
    for (i, slot) in window.iter_mut().enumerate() {
        *slot = sampler.sample().checked().inspect_err(|_| {
            warn!("wake: sample {} of {} faulted", i + 1, DEBOUNCE_SAMPLES);
        })?;
        delay.delay_ms(DEBOUNCE_DELAY_MS);
    }
    Ok(window)
}

/// Classify a debounce window.  Any fault aborts; otherwise the wake is a
/// watchdog wake iff no sample was active.
pub fn classify(window: &[Sample; DEBOUNCE_SAMPLES]) -> Result<WakeCause, SampleFault> {
    let mut active = 0usize;
    for sample in window {
        if sample.checked()?.is_active() {
            active += 1;
        }
    }
    let cause = if active == 0 {
        WakeCause::Watchdog
    } else {
        WakeCause::FlowEvent
    };
    info!("wake: {}/{} active samples -> {:?}", active, DEBOUNCE_SAMPLES, cause);
    Ok(cause)
}
