//! Integration tests for the host-simulated BLE advertiser driven by the
//! node.

use flomon::adapters::ble::{BleAdvertiser, BleState};
use flomon::app::events::AppEvent;
use flomon::app::service::{Cycle, Node};
use flomon::config::DEVICE_NAME;
use flomon::error::{Error, SampleFault};
use flomon::sensors::Sample::{Active as A, Fault as F, Inactive as I};

use crate::mock_hw::{FakeDelay, RecordingPower, RecordingSink, ScriptedSampler};

fn service_data(adv: &[u8]) -> &[u8] {
    // flags (3) + name (2 + len), then `08 16` and the 7 payload bytes.
    let at = 3 + 2 + DEVICE_NAME.len();
    assert_eq!(&adv[at..at + 2], &[0x08, 0x16]);
    &adv[at + 2..at + 9]
}

#[test]
fn node_keeps_radio_in_sync_with_state() {
    let radio = BleAdvertiser::enable(DEVICE_NAME).unwrap();
    assert_eq!(radio.state(), BleState::Ready);

    let mut sink = RecordingSink::new();
    let mut delay = FakeDelay::default();
    let mut node = Node::boot(
        ScriptedSampler::new([I, I, I, A]),
        RecordingPower::default(),
        radio,
        &mut delay,
        &mut sink,
    )
    .unwrap();

    assert_eq!(node.radio().state(), BleState::Advertising);
    let adv = node.radio().on_air().unwrap().as_bytes();
    assert_eq!(service_data(adv), &[0xD2, 0xFC, 0x40, 0x27, 0x00, 0x0F, 0x01]);

    node.tick(&mut sink).unwrap();
    let adv = node.radio().on_air().unwrap().as_bytes();
    assert_eq!(service_data(adv), &[0xD2, 0xFC, 0x40, 0x27, 0x01, 0x0F, 0x00]);
    assert_eq!(node.radio().sim_update_count(), 1);
}

#[test]
fn refused_update_leaves_previous_payload_on_air() {
    let mut sink = RecordingSink::new();
    let mut delay = FakeDelay::default();
    let mut node = Node::boot(
        ScriptedSampler::new([I, I, I, A, A]),
        RecordingPower::default(),
        BleAdvertiser::enable(DEVICE_NAME).unwrap(),
        &mut delay,
        &mut sink,
    )
    .unwrap();
    node.radio_mut().sim_refuse_updates(1);

    assert!(matches!(node.tick(&mut sink), Ok(Cycle::Polled { pushed: false, .. })));
    let adv = node.radio().on_air().unwrap().as_bytes();
    assert_eq!(service_data(adv)[4], 0x00, "stale payload still on air");
    assert!(sink.events.iter().any(|e| matches!(e, AppEvent::BroadcastFailed(_))));

    assert!(matches!(node.tick(&mut sink), Ok(Cycle::Polled { pushed: true, .. })));
    let adv = node.radio().on_air().unwrap().as_bytes();
    assert_eq!(service_data(adv)[4], 0x01);
}

#[test]
fn loop_fault_takes_node_off_air() {
    let mut sink = RecordingSink::new();
    let mut delay = FakeDelay::default();
    let mut node = Node::boot(
        ScriptedSampler::new([A, A, A, A, F]),
        RecordingPower::default(),
        BleAdvertiser::enable(DEVICE_NAME).unwrap(),
        &mut delay,
        &mut sink,
    )
    .unwrap();

    let err = node.run(&mut delay, &mut sink);

    assert_eq!(err, Error::Sample(SampleFault));
    assert_eq!(node.radio().state(), BleState::Stopped);
    assert!(node.radio().on_air().is_none(), "running payload must not stay on air");
}
