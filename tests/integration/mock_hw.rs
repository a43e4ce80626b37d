//! Mock hardware adapters for integration tests.
//!
//! Records every port call so tests can assert on the full history
//! without touching real GPIO or the radio.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use flomon::app::events::AppEvent;
use flomon::app::ports::{Broadcaster, EventSink, InputSampler, PowerOutput};
use flomon::broadcast::BroadcastPayload;
use flomon::error::{BroadcastError, InitError};
use flomon::sensors::Sample;

// ── ScriptedSampler ───────────────────────────────────────────

/// Replays a fixed sample script, then reads `Inactive` forever.
pub struct ScriptedSampler {
    script: VecDeque<Sample>,
    pub reads: usize,
}

#[allow(dead_code)]
impl ScriptedSampler {
    pub fn new(script: impl IntoIterator<Item = Sample>) -> Self {
        Self {
            script: script.into_iter().collect(),
            reads: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSampler for ScriptedSampler {
    fn sample(&mut self) -> Sample {
        self.reads += 1;
        self.script.pop_front().unwrap_or(Sample::Inactive)
    }
}

// ── RecordingPower ────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingPower {
    pub cuts: u32,
}

impl PowerOutput for RecordingPower {
    fn cut_power(&mut self) {
        self.cuts += 1;
    }

    fn is_cut(&self) -> bool {
        self.cuts > 0
    }
}

// ── RecordingBroadcaster ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioCall {
    Start(BroadcastPayload),
    Push(BroadcastPayload),
    Stop,
}

#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    pub calls: Vec<RadioCall>,
    /// Fail `start` with this driver code.
    pub fail_start: Option<i32>,
    /// Refuse this many upcoming pushes.
    pub refuse_pushes: u32,
}

#[allow(dead_code)]
impl RecordingBroadcaster {
    pub fn started(&self) -> Option<BroadcastPayload> {
        self.calls.iter().find_map(|c| match c {
            RadioCall::Start(p) => Some(*p),
            RadioCall::Push(_) | RadioCall::Stop => None,
        })
    }

    pub fn pushed(&self) -> Vec<BroadcastPayload> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RadioCall::Push(p) => Some(*p),
                RadioCall::Start(_) | RadioCall::Stop => None,
            })
            .collect()
    }

    /// Payload a scanner would currently see; `None` once stopped.
    pub fn last_on_air(&self) -> Option<BroadcastPayload> {
        self.calls.last().and_then(|c| match c {
            RadioCall::Start(p) | RadioCall::Push(p) => Some(*p),
            RadioCall::Stop => None,
        })
    }

    pub fn stopped(&self) -> bool {
        self.calls.contains(&RadioCall::Stop)
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn start(&mut self, payload: BroadcastPayload) -> Result<(), InitError> {
        if let Some(rc) = self.fail_start {
            return Err(InitError::AdvertisingStart(rc));
        }
        self.calls.push(RadioCall::Start(payload));
        Ok(())
    }

    fn push(&mut self, payload: BroadcastPayload) -> Result<(), BroadcastError> {
        if self.refuse_pushes > 0 {
            self.refuse_pushes -= 1;
            return Err(BroadcastError::UpdateRejected(-1));
        }
        self.calls.push(RadioCall::Push(payload));
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.push(RadioCall::Stop);
    }
}

// ── FakeDelay ─────────────────────────────────────────────────

/// Accumulates requested sleep time instead of sleeping.
#[derive(Debug, Default)]
pub struct FakeDelay {
    pub total_ns: u64,
}

#[allow(dead_code)]
impl FakeDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}
