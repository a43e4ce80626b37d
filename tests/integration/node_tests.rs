//! Integration tests for the boot → poll → power-off pipeline.
//!
//! Drive [`Node`] through scripted flow-switch reads and assert on what
//! reached the radio, the power latch and the event sink.

use flomon::app::events::AppEvent;
use flomon::app::service::{Cycle, Node};
use flomon::config::{DEBOUNCE_DELAY_MS, DEBOUNCE_SAMPLES, IDLE_THRESHOLD, POLL_INTERVAL_MS};
use flomon::error::{Error, InitError, SampleFault};
use flomon::fsm::Phase;
use flomon::sensors::Sample::{self, Active as A, Fault as F, Inactive as I};
use flomon::sensors::wake::WakeCause;

use crate::mock_hw::{FakeDelay, RecordingBroadcaster, RecordingPower, RecordingSink, ScriptedSampler};

type TestNode = Node<ScriptedSampler, RecordingPower, RecordingBroadcaster>;

fn boot_with(
    script: impl IntoIterator<Item = Sample>,
    radio: RecordingBroadcaster,
) -> (Result<TestNode, Error>, FakeDelay, RecordingSink) {
    let mut delay = FakeDelay::default();
    let mut sink = RecordingSink::new();
    let node = Node::boot(
        ScriptedSampler::new(script),
        RecordingPower::default(),
        radio,
        &mut delay,
        &mut sink,
    );
    (node, delay, sink)
}

fn boot(script: impl IntoIterator<Item = Sample>) -> (TestNode, FakeDelay, RecordingSink) {
    let (node, delay, sink) = boot_with(script, RecordingBroadcaster::default());
    (node.expect("boot should succeed"), delay, sink)
}

// ── Boot classification ──────────────────────────────────────

#[test]
fn three_inactive_samples_boot_as_watchdog() {
    let (node, _, sink) = boot([I, I, I]);

    assert_eq!(node.wake_cause(), WakeCause::Watchdog);
    assert!(node.state().watchdog_wake);
    assert_eq!(
        node.radio().started().unwrap().as_bytes(),
        &[0xD2, 0xFC, 0x40, 0x27, 0x00, 0x0F, 0x01]
    );
    assert!(matches!(sink.events[..], [AppEvent::Booted { cause: WakeCause::Watchdog, .. }]));
}

#[test]
fn any_active_sample_boots_as_flow_event() {
    let (node, _, _) = boot([A, I, I]);

    assert_eq!(node.wake_cause(), WakeCause::FlowEvent);
    assert_eq!(
        node.radio().started().unwrap().as_bytes(),
        &[0xD2, 0xFC, 0x40, 0x27, 0x00, 0x0F, 0x00]
    );
}

#[test]
fn boot_sleeps_after_every_debounce_sample() {
    let (node, delay, _) = boot([I, A, I]);

    assert_eq!(node.wake_cause(), WakeCause::FlowEvent);
    assert_eq!(delay.total_ms(), u64::from(DEBOUNCE_DELAY_MS) * DEBOUNCE_SAMPLES as u64);
}

#[test]
fn boot_fault_stops_before_advertising() {
    let (node, _, sink) = boot_with([A, F, A], RecordingBroadcaster::default());

    let err = node.err().expect("fault must fail boot");
    assert_eq!(err, Error::Sample(SampleFault));
    assert!(err.is_fatal());
    assert_eq!(sink.events, vec![AppEvent::Halted(Error::Sample(SampleFault))]);
}

#[test]
fn radio_start_failure_fails_boot() {
    let radio = RecordingBroadcaster {
        fail_start: Some(-5),
        ..RecordingBroadcaster::default()
    };
    let (node, _, _) = boot_with([A, A, A], radio);

    assert_eq!(node.err(), Some(Error::Init(InitError::AdvertisingStart(-5))));
}

// ── Poll loop ────────────────────────────────────────────────

#[test]
fn active_sample_after_nineteen_idle_cycles_resumes_running() {
    let mut script = vec![A, A, A];
    script.extend([I; 19]);
    script.push(A);
    let (mut node, mut delay, mut sink) = boot(script);

    node.run_for(19, &mut delay, &mut sink).unwrap();
    assert_eq!(node.phase(), Phase::Idle(19));

    let cycle = node.tick(&mut sink).unwrap();
    let Cycle::Polled { state, pushed } = cycle else {
        panic!("expected a normal cycle, got {cycle:?}");
    };
    assert!(pushed);
    assert!(state.running);
    assert_eq!(state.idle_count, 0);
    assert_eq!(node.power().cuts, 0);
}

#[test]
fn twenty_idle_cycles_cut_power_once_on_the_twentieth() {
    let mut script = vec![A, A, A, A];
    script.extend([I; 30]);
    let (mut node, mut delay, mut sink) = boot(script);

    assert!(matches!(node.tick(&mut sink), Ok(Cycle::Polled { .. })));
    assert_eq!(node.phase(), Phase::Running);

    for n in 1..IDLE_THRESHOLD {
        assert!(matches!(node.tick(&mut sink), Ok(Cycle::Polled { .. })));
        assert_eq!(node.phase(), Phase::Idle(n));
        assert_eq!(node.power().cuts, 0, "cut too early at idle {n}");
    }

    let last = node.tick(&mut sink).unwrap();
    assert!(matches!(last, Cycle::PowerCut(s) if s.idle_count == IDLE_THRESHOLD));
    assert_eq!(node.power().cuts, 1);

    // Keeps looping until the rail drops, without cutting again.
    node.run_for(10, &mut delay, &mut sink).unwrap();
    assert_eq!(node.power().cuts, 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::PowerCut { .. })), 1);
}

#[test]
fn final_payload_is_pushed_before_power_cut() {
    let (mut node, mut delay, mut sink) = boot([A, A, A]);

    node.run_for(IDLE_THRESHOLD as usize, &mut delay, &mut sink).unwrap();

    let last = node.radio().last_on_air().unwrap();
    assert!(!last.running());
    assert_eq!(node.radio().pushed().len(), IDLE_THRESHOLD as usize);
    assert_eq!(node.power().cuts, 1);
}

#[test]
fn flow_clears_watchdog_flag() {
    let (mut node, _, mut sink) = boot([I, I, I, I, A, I]);

    node.tick(&mut sink).unwrap();
    assert!(node.state().watchdog_wake, "idle cycle keeps the watchdog flag");
    node.tick(&mut sink).unwrap();
    node.tick(&mut sink).unwrap();
    assert!(!node.state().watchdog_wake);

    let pushed = node.radio().pushed();
    assert!(pushed[0].watchdog_wake());
    assert!(pushed[1].running() && !pushed[1].watchdog_wake());
    assert!(!pushed[2].running() && !pushed[2].watchdog_wake());
}

#[test]
fn refused_pushes_are_retried_with_current_state() {
    let radio = RecordingBroadcaster {
        refuse_pushes: 2,
        ..RecordingBroadcaster::default()
    };
    let (node, mut delay, mut sink) = boot_with([I, I, I, A, A, I], radio);
    let mut node = node.unwrap();

    node.run_for(3, &mut delay, &mut sink).unwrap();

    assert_eq!(sink.count(|e| matches!(e, AppEvent::BroadcastFailed(_))), 2);
    let pushed = node.radio().pushed();
    assert_eq!(pushed.len(), 1);
    assert!(!pushed[0].running());
    assert_eq!(node.cycles(), 3);
}

#[test]
fn fault_mid_loop_is_fatal_and_pushes_nothing() {
    let (mut node, mut delay, mut sink) = boot([A, A, A, A, I, F, A]);

    let err = node.run(&mut delay, &mut sink);

    assert_eq!(err, Error::Sample(SampleFault));
    assert_eq!(node.radio().pushed().len(), 2);
    assert!(node.radio().stopped());
    assert_eq!(node.radio().last_on_air(), None, "stale payload left on air");
    assert_eq!(node.power().cuts, 0);
    assert_eq!(sink.events.last(), Some(&AppEvent::Halted(Error::Sample(SampleFault))));
}

#[test]
fn poll_cycle_sleeps_one_interval() {
    let (mut node, _, mut sink) = boot([A, A, A]);
    let mut delay = FakeDelay::default();

    node.run_for(5, &mut delay, &mut sink).unwrap();

    assert_eq!(delay.total_ms(), 5 * u64::from(POLL_INTERVAL_MS));
}
