//! Application service: the hexagonal core.
//!
//! [`Node`] owns the state tracker and every driven port.  It exposes a
//! boot step and a per-cycle tick; the poll loop is a plain timed loop
//! around [`Node::tick`] with the poll sleep as its only suspension point.
//!
//! ```text
//!  InputSampler ──▶ ┌──────────────────────────┐ ──▶ Broadcaster
//!                   │          Node            │
//!   PowerOutput ◀── │  WakeClassifier · FSM    │ ──▶ EventSink
//!                   └──────────────────────────┘
//! ```
//!
//! Failure policy: a faulted sample stops the node and takes it off air
//! (at boot nothing is ever advertised); a refused payload update is
//! reported and retried with the next cycle's payload.

use core::mem::discriminant;

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use crate::broadcast::encode;
use crate::config::POLL_INTERVAL_MS;
use crate::error::{Error, Result};
use crate::fsm::{DeviceState, Phase, StateTracker, Transition};
use crate::sensors::wake::{self, WakeCause};

use super::events::AppEvent;
use super::ports::{Broadcaster, EventSink, InputSampler, PowerOutput};

// ───────────────────────────────────────────────────────────────
// Cycle outcome
// ───────────────────────────────────────────────────────────────

/// What one poll cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Sampled, updated and pushed (`pushed == false` if the radio refused).
    Polled { state: DeviceState, pushed: bool },
    /// The idle threshold was reached: final payload pushed, power cut.
    PowerCut(DeviceState),
    /// Power was already cut; nothing sampled.
    Halted,
}

// ───────────────────────────────────────────────────────────────
// Node
// ───────────────────────────────────────────────────────────────

/// The flow node: sampler, tracker, radio and power latch.
pub struct Node<S, P, B> {
    sampler: S,
    power: P,
    radio: B,
    tracker: StateTracker,
    cycles: u64,
    cause: WakeCause,
}

impl<S, P, B> Node<S, P, B>
where
    S: InputSampler,
    P: PowerOutput,
    B: Broadcaster,
{
    // ── Lifecycle ─────────────────────────────────────────────

    /// Classify the wake cause from the debounce window and start
    /// advertising the boot state.
    ///
    /// A faulted sample or a radio start failure is fatal: the error is
    /// returned and nothing is advertised.
    pub fn boot(
        mut sampler: S,
        power: P,
        mut radio: B,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<Self> {
        let cause = match wake::sample_window(&mut sampler, delay).and_then(|w| wake::classify(&w)) {
            Ok(cause) => cause,
            Err(fault) => return Err(halt(fault.into(), sink)),
        };

        let tracker = StateTracker::new(cause);
        let state = tracker.state();
        if let Err(e) = radio.start(encode(&state)) {
            radio.stop();
            return Err(halt(e.into(), sink));
        }

        info!("Node booted ({:?}), advertising {:?}", cause, state);
        sink.emit(&AppEvent::Booted { cause, state });

        Ok(Self {
            sampler,
            power,
            radio,
            tracker,
            cycles: 0,
            cause,
        })
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one poll cycle: sample → transition → encode → push, and cut
    /// power when the tracker asks for it.  Does not sleep.
    ///
    /// Returns `Err` only for fatal errors; the caller must stop polling.
    pub fn tick(&mut self, sink: &mut impl EventSink) -> Result<Cycle> {
        if self.tracker.is_powered_off() || self.power.is_cut() {
            return Ok(Cycle::Halted);
        }
        self.cycles += 1;

        let before = self.tracker.phase();
        let transition = match self.tracker.step(self.sampler.sample()) {
            Ok(t) => t,
            Err(fault) => {
                self.radio.stop();
                return Err(halt(fault.into(), sink));
            }
        };

        let (state, power_off) = match transition {
            Transition::Updated(state) => (state, false),
            Transition::PowerOff(state) => (state, true),
            Transition::Halted => return Ok(Cycle::Halted),
        };

        let after = self.tracker.phase();
        if discriminant(&before) != discriminant(&after) {
            info!("Phase {} -> {}", before, after);
            sink.emit(&AppEvent::PhaseChanged { from: before, to: after });
        }

        let pushed = self.push(state, sink);

        if power_off {
            info!("Idle for {} cycles, cutting power", state.idle_count);
            sink.emit(&AppEvent::PowerCut { idle_cycles: state.idle_count });
            self.power.cut_power();
            return Ok(Cycle::PowerCut(state));
        }

        Ok(Cycle::Polled { state, pushed })
    }

    /// Poll forever, sleeping [`POLL_INTERVAL_MS`] between cycles.  Keeps
    /// cycling after power is cut, until the rail actually drops.  Only
    /// returns on a fatal error.
    pub fn run(&mut self, delay: &mut impl DelayNs, sink: &mut impl EventSink) -> Error {
        loop {
            if let Err(e) = self.tick(sink) {
                return e;
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }
    }

    /// Bounded form of [`run`](Self::run) for host simulation.
    pub fn run_for(
        &mut self,
        cycles: usize,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        for _ in 0..cycles {
            self.tick(sink)?;
            delay.delay_ms(POLL_INTERVAL_MS);
        }
        Ok(())
    }

    fn push(&mut self, state: DeviceState, sink: &mut impl EventSink) -> bool {
        match self.radio.push(encode(&state)) {
            Ok(()) => true,
            Err(e) => {
                warn!("Payload update failed ({}), retrying next cycle", e);
                sink.emit(&AppEvent::BroadcastFailed(e));
                false
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> DeviceState {
        self.tracker.state()
    }

    pub fn phase(&self) -> Phase {
        self.tracker.phase()
    }

    pub fn wake_cause(&self) -> WakeCause {
        self.cause
    }

    /// Poll cycles run since boot (halted cycles excluded).
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    pub fn radio(&self) -> &B {
        &self.radio
    }

    pub fn radio_mut(&mut self) -> &mut B {
        &mut self.radio
    }
}

fn halt(e: Error, sink: &mut impl EventSink) -> Error {
    error!("Fatal: {}, node stopped", e);
    sink.emit(&AppEvent::Halted(e));
    e
}
