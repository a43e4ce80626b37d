//! Flomon firmware, main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  FlowSwitch      PowerLatch     BleAdvertiser  LogSink   │
//! │  (InputSampler)  (PowerOutput)  (Broadcaster)  (Events)  │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ──────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │           Node (pure logic)                        │  │
//! │  │  WakeClassifier · StateTracker · PayloadEncoder    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The node is powered by an external power-management chip.  Power-on
//! means either the flow switch closed or the chip's timer fired; the
//! node tells them apart, advertises its state once per second and
//! pulls the DONE line when the tap has been idle long enough.
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, PinDriver, Pull};
use log::{error, info};

use flomon::adapters::ble::BleAdvertiser;
use flomon::adapters::log_sink::LogEventSink;
use flomon::app::service::Node;
use flomon::config::{NodeConfig, DEVICE_NAME};
use flomon::drivers::power_latch::PowerLatch;
use flomon::error::{Error, InitError};
use flomon::pins;
use flomon::sensors::flow_switch::FlowSwitch;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Flomon v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = NodeConfig::BUILT_IN;
    if let Err(msg) = config.validate() {
        park(InitError::Config(msg).into());
    }
    match config.to_json() {
        Ok(json) => info!("Config: {}", json),
        Err(e) => info!("Config: {:?} ({})", config, e),
    }

    // ── 2. I/O lines ──────────────────────────────────────────
    // The DONE line is driven low first so a floating pin cannot cut
    // power during bring-up.
    // SAFETY: each GPIO number is claimed exactly once, here.
    let done_pin = unsafe { AnyIOPin::new(pins::PM_DONE_GPIO) };
    let mut done = match PinDriver::output(done_pin) {
        Ok(d) => d,
        Err(_) => park(InitError::GpioConfig("power latch").into()),
    };
    if done.set_low().is_err() {
        park(InitError::GpioConfig("power latch").into());
    }

    // SAFETY: as above.
    let flow_pin = unsafe { AnyIOPin::new(pins::FLOW_SWITCH_GPIO) };
    let mut flow = match PinDriver::input(flow_pin) {
        Ok(f) => f,
        Err(_) => park(InitError::GpioConfig("flow switch").into()),
    };
    if flow.set_pull(Pull::Down).is_err() {
        park(InitError::GpioConfig("flow switch").into());
    }

    // ── 3. Radio ──────────────────────────────────────────────
    let radio = match BleAdvertiser::enable(DEVICE_NAME) {
        Ok(r) => r,
        Err(e) => park(e.into()),
    };

    // ── 4. Boot classification and poll loop ─────────────────
    let mut delay = FreeRtos;
    let mut sink = LogEventSink::new();
    let mut node = match Node::boot(
        FlowSwitch::new(flow),
        PowerLatch::new(done),
        radio,
        &mut delay,
        &mut sink,
    ) {
        Ok(n) => n,
        Err(e) => park(e),
    };

    info!("Node ready ({:?}). Entering poll loop.", node.wake_cause());
    let e = node.run(&mut delay, &mut sink);
    park(e)
}

/// Stop on a fatal error.  Errors from `Node` arrive with the radio
/// already off air, and earlier ones happen before advertising starts, so
/// nothing is advertised from here on.  The power-management chip's timer
/// will power-cycle the node.
fn park(e: Error) -> ! {
    error!("Halted: {}", e);
    loop {
        FreeRtos::delay_ms(1000);
    }
}
