//! Compile-time configuration.
//!
//! The node has no runtime configuration surface: no NVS, no provisioning,
//! no console.  Every tunable lives here as a `const`, and [`NodeConfig`]
//! groups them so the boot path can validate and log the effective set.

use serde::Serialize;

// --- Power-off policy ---

/// Consecutive inactive poll cycles before the node cuts its own power.
pub const IDLE_THRESHOLD: u8 = 20;

// --- Wake debounce ---

/// Samples taken at boot to classify the wake cause.
pub const DEBOUNCE_SAMPLES: usize = 3;
/// Delay after each debounce sample (milliseconds).
pub const DEBOUNCE_DELAY_MS: u32 = 50;

// --- Advertising ---

/// Slow advertising interval lower bound, in 0.625 ms units (1 s).
pub const ADV_INTERVAL_MIN: u16 = 0x0640;
/// Slow advertising interval upper bound, in 0.625 ms units (1.2 s).
pub const ADV_INTERVAL_MAX: u16 = 0x0780;

/// Poll period: one sample per advertising interval lower bound.
pub const POLL_INTERVAL_MS: u32 = ADV_INTERVAL_MIN as u32 * 625 / 1000;

/// Complete local name carried in every advertisement.
pub const DEVICE_NAME: &str = "Tap Sensor";

// --- BTHome v2 service data ---

/// 16-bit service UUID assigned to BTHome.
pub const SERVICE_UUID: u16 = 0xFCD2;
/// BTHome device-information byte: v2, unencrypted, irregular updates.
pub const BTHOME_DEVICE_INFO: u8 = 0x40;
/// BTHome object id for the "running" binary sensor.
pub const BTHOME_RUNNING_ID: u8 = 0x27;
/// BTHome object id for a generic boolean (used for the watchdog flag).
pub const BTHOME_GENERIC_BOOL_ID: u8 = 0x0F;

/// Length of the service data block, UUID included.
pub const SERVICE_DATA_LEN: usize = 7;

/// Legacy advertising data capacity.
pub const MAX_ADV_DATA_LEN: usize = 31;

/// Shortest interval allowed for non-connectable advertising (100 ms).
const MIN_NONCONN_INTERVAL: u16 = 0x00A0;
/// Longest legacy advertising interval (10.24 s).
const MAX_LEGACY_INTERVAL: u16 = 0x4000;
/// Room left for the name after flags (3), the name header (2) and the
/// service data structure (2 + 7).
pub const NAME_BUDGET: usize = MAX_ADV_DATA_LEN - 3 - 2 - (2 + SERVICE_DATA_LEN);

/// The effective compile-time configuration, grouped for validation and
/// the boot log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeConfig {
    pub idle_threshold: u8,
    pub debounce_samples: usize,
    pub debounce_delay_ms: u32,
    pub poll_interval_ms: u32,
    pub adv_interval_min: u16,
    pub adv_interval_max: u16,
    pub device_name: &'static str,
}

impl NodeConfig {
    /// The configuration baked into this build.
    pub const BUILT_IN: Self = Self {
        idle_threshold: IDLE_THRESHOLD,
        debounce_samples: DEBOUNCE_SAMPLES,
        debounce_delay_ms: DEBOUNCE_DELAY_MS,
        poll_interval_ms: POLL_INTERVAL_MS,
        adv_interval_min: ADV_INTERVAL_MIN,
        adv_interval_max: ADV_INTERVAL_MAX,
        device_name: DEVICE_NAME,
    };

    /// Check the invariants the rest of the firmware assumes.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.idle_threshold == 0 {
            return Err("idle_threshold must be at least 1");
        }
        if self.debounce_samples == 0 {
            return Err("debounce_samples must be at least 1");
        }
        if self.adv_interval_min < MIN_NONCONN_INTERVAL || self.adv_interval_max > MAX_LEGACY_INTERVAL {
            return Err("advertising interval outside 100 ms..10.24 s");
        }
        if self.adv_interval_min > self.adv_interval_max {
            return Err("adv_interval_min above adv_interval_max");
        }
        if self.device_name.is_empty() || self.device_name.len() > NAME_BUDGET {
            return Err("device_name does not fit the advertising data");
        }
        Ok(())
    }

    /// Render as JSON for the boot log.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::BUILT_IN
    }
}
