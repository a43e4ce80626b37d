//! Fuzz target: `TapStatus::from_service_data` + `TapMonitor::observe`
//!
//! Feeds arbitrary bytes to the gateway decoder as service data chunks
//! and asserts that it never panics, only accepts 5- or 7-byte input,
//! and that the monitor only ever emits well-formed JSON.
//!
//! cargo fuzz run fuzz_service_data

#![no_main]

use flomon::gateway::TapStatus;
use flomon::gateway::monitor::TapMonitor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut monitor = TapMonitor::new();

    // First byte picks the chunk size, the rest is a stream of adverts.
    let Some((&width, rest)) = data.split_first() else {
        return;
    };
    let width = usize::from(width % 9).max(1);

    for chunk in rest.chunks(width) {
        match TapStatus::from_service_data(chunk) {
            Ok(status) => {
                assert!(chunk.len() == 5 || chunk.len() == 7, "accepted {} bytes", chunk.len());
                if let Some(msg) = monitor.observe(status) {
                    let json = msg.to_json().expect("messages always serialise");
                    assert!(json.starts_with('{') && json.ends_with('}'));
                }
            }
            Err(e) => {
                let _ = e.to_string();
            }
        }
    }
});
