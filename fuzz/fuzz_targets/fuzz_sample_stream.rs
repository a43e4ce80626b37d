//! Fuzz target: `StateTracker::step`
//!
//! Interprets each input byte as a flow-switch read and asserts the
//! tracker's invariants: the idle count never passes the threshold,
//! power-off fires at most once, and a fault never changes state.
//!
//! cargo fuzz run fuzz_sample_stream

#![no_main]

use flomon::config::IDLE_THRESHOLD;
use flomon::fsm::{StateTracker, Transition};
use flomon::sensors::Sample;
use flomon::sensors::wake::WakeCause;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let wake = if first & 1 == 0 { WakeCause::FlowEvent } else { WakeCause::Watchdog };
    let mut tracker = StateTracker::new(wake);
    let mut power_offs = 0;

    for &b in rest {
        let sample = match b % 3 {
            0 => Sample::Inactive,
            1 => Sample::Active,
            _ => Sample::Fault,
        };
        let before = tracker.state();
        match tracker.step(sample) {
            Ok(Transition::PowerOff(_)) => power_offs += 1,
            Ok(_) => {}
            Err(_) => assert_eq!(tracker.state(), before),
        }
        assert!(tracker.state().idle_count <= IDLE_THRESHOLD);
    }
    assert!(power_offs <= 1);
});
