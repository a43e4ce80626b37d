//! BLE advertising adapter.
//!
//! Implements [`Broadcaster`] by putting the BTHome service data into a
//! non-connectable legacy advertisement.  There is no GATT server, no
//! scan response and no connection handling: the payload is the whole
//! interface.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid GAP raw advertising via
//!   `esp_idf_svc::sys`.
//! - **all other targets**: an in-memory simulation that keeps the packet
//!   on air and can be told to refuse updates.
//!
//! ## Advertising parameters
//!
//! | Parameter      | Value                                    |
//! |----------------|------------------------------------------|
//! | Address        | Public (identity) address                |
//! | Type           | `ADV_NONCONN_IND`                        |
//! | Interval       | 0x0640–0x0780 (1 s–1.2 s)                |
//! | Channels       | 37, 38, 39                               |
//! | Scan response  | none                                     |
//!
//! ## Update acknowledgement
//!
//! On the device, `esp_ble_gap_config_adv_data_raw` only queues the new
//! data; the controller's verdict arrives later in the GAP callback.  A
//! rejection reported there is logged but cannot be returned from
//! [`Broadcaster::push`], which has already returned `Ok` and recorded the
//! packet as on air.  `BroadcastFailed` events on hardware therefore only
//! cover synchronous rejections.

use log::{info, warn};

use crate::app::ports::Broadcaster;
use crate::broadcast::{AdvertisingPacket, BroadcastPayload};
use crate::config::NAME_BUDGET;
use crate::error::{BroadcastError, InitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    /// Stack enabled, nothing on air yet.
    Ready,
    Advertising,
    /// Advertising stopped after a fatal error; stays stopped.
    Stopped,
}

// ── ESP-IDF GAP static state ──────────────────────────────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures.  Setting raw advertising data is asynchronous; the first
// completion starts advertising.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

#[cfg(target_os = "espidf")]
static ADV_START_PENDING: AtomicBool = AtomicBool::new(false);

#[cfg(target_os = "espidf")]
fn adv_params() -> esp_idf_svc::sys::esp_ble_adv_params_t {
    use crate::config::{ADV_INTERVAL_MAX, ADV_INTERVAL_MIN};
    use esp_idf_svc::sys::*;
    // SAFETY: all-zero is a valid bit pattern for this plain C struct.
    esp_ble_adv_params_t {
        adv_int_min: ADV_INTERVAL_MIN,
        adv_int_max: ADV_INTERVAL_MAX,
        adv_type: esp_ble_adv_type_t_ADV_TYPE_NONCONN_IND,
        own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
        channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
        adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
        ..unsafe { core::mem::zeroed() }
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_DATA_RAW_SET_COMPLETE_EVT => {
            // SAFETY: Bluedroid passes a valid param for this event.
            let status = unsafe { (*param).adv_data_raw_cmpl.status };
            if status != esp_bt_status_t_ESP_BT_STATUS_SUCCESS {
                log::warn!("BLE GAP: raw adv data rejected (status={})", status);
            } else if ADV_START_PENDING.swap(false, AtomicOrdering::AcqRel) {
                let mut params = adv_params();
                // SAFETY: params outlives the call; Bluedroid copies it.
                let ret = unsafe { esp_ble_gap_start_advertising(&mut params) };
                if ret != ESP_OK as i32 {
                    log::error!("BLE GAP: start_advertising failed ({})", ret);
                }
            }
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            // SAFETY: as above.
            let status = unsafe { (*param).adv_start_cmpl.status };
            if status == esp_bt_status_t_ESP_BT_STATUS_SUCCESS {
                log::info!("BLE GAP: advertising started");
            } else {
                log::error!("BLE GAP: advertising start failed (status={})", status);
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleAdvertiser {
    device_name: heapless::String<NAME_BUDGET>,
    state: BleState,
    /// Last packet the controller accepted.
    on_air: Option<AdvertisingPacket>,
    #[cfg(not(target_os = "espidf"))]
    sim_refuse_updates: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_updates: u32,
}

impl BleAdvertiser {
    /// Bring up the BLE stack.  Failure is fatal for the node.
    pub fn enable(device_name: &str) -> Result<Self, InitError> {
        let mut name = heapless::String::new();
        name.push_str(device_name)
            .map_err(|()| InitError::Config("device name overflows advertising data"))?;

        let mut adapter = Self {
            device_name: name,
            state: BleState::Ready,
            on_air: None,
            #[cfg(not(target_os = "espidf"))]
            sim_refuse_updates: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_updates: 0,
        };
        adapter.platform_enable()?;
        Ok(adapter)
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// The advertising data currently on air.
    pub fn on_air(&self) -> Option<&AdvertisingPacket> {
        self.on_air.as_ref()
    }

    /// Make the next `n` payload updates fail (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_refuse_updates(&mut self, n: u32) {
        self.sim_refuse_updates = n;
    }

    /// Accepted payload updates since advertising started (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_update_count(&self) -> u32 {
        self.sim_updates
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_enable(&mut self) -> Result<(), InitError> {
        use esp_idf_svc::sys::*;
        // SAFETY: called once from main() before the poll loop; Bluedroid
        // init calls are not re-entered.
        unsafe {
            // BLE-only: release classic BT memory.
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            let ret = esp_bt_controller_init(&mut bt_cfg);
            if ret != ESP_OK as i32 {
                return Err(InitError::RadioEnable(ret));
            }

            let ret = esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE);
            if ret != ESP_OK as i32 {
                return Err(InitError::RadioEnable(ret));
            }

            let ret = esp_bluedroid_init();
            if ret != ESP_OK as i32 {
                return Err(InitError::RadioEnable(ret));
            }

            let ret = esp_bluedroid_enable();
            if ret != ESP_OK as i32 {
                return Err(InitError::RadioEnable(ret));
            }

            let ret = esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            if ret != ESP_OK as i32 {
                return Err(InitError::RadioEnable(ret));
            }
        }
        info!("BLE(espidf): Bluedroid up");
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_enable(&mut self) -> Result<(), InitError> {
        info!("BLE(sim): stack enabled");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_set_data(&mut self, data: &[u8]) -> Result<(), i32> {
        use esp_idf_svc::sys::*;
        // SAFETY: Bluedroid copies the buffer before returning.
        let ret = unsafe { esp_ble_gap_config_adv_data_raw(data.as_ptr().cast_mut(), data.len() as u32) };
        if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_set_data(&mut self, _data: &[u8]) -> Result<(), i32> {
        if self.sim_refuse_updates > 0 {
            self.sim_refuse_updates -= 1;
            // ESP_ERR_INVALID_STATE
            return Err(0x103);
        }
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&mut self) {
        use esp_idf_svc::sys::*;
        ADV_START_PENDING.store(false, AtomicOrdering::Release);
        // SAFETY: plain GAP call, no pointers passed.
        let ret = unsafe { esp_ble_gap_stop_advertising() };
        if ret == ESP_OK as i32 {
            info!("BLE(espidf): advertising stopped");
        } else {
            warn!("BLE(espidf): stop_advertising failed ({})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&mut self) {
        info!("BLE(sim): stopped");
    }

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self, data: &[u8]) -> Result<(), i32> {
        ADV_START_PENDING.store(true, AtomicOrdering::Release);
        self.platform_set_data(data).inspect_err(|_| {
            ADV_START_PENDING.store(false, AtomicOrdering::Release);
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self, _data: &[u8]) -> Result<(), i32> {
        info!("BLE(sim): advertising '{}'", self.device_name);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Broadcaster implementation
// ───────────────────────────────────────────────────────────────

impl Broadcaster for BleAdvertiser {
    fn start(&mut self, payload: BroadcastPayload) -> Result<(), InitError> {
        let packet = AdvertisingPacket::new(&self.device_name, &payload)
            .map_err(|_| InitError::Config("advertising data exceeds 31 bytes"))?;
        self.platform_start(packet.as_bytes())
            .map_err(InitError::AdvertisingStart)?;
        info!("BLE: advertising as '{}' with {:02X?}", self.device_name, payload.as_bytes());
        self.on_air = Some(packet);
        self.state = BleState::Advertising;
        Ok(())
    }

    fn push(&mut self, payload: BroadcastPayload) -> Result<(), BroadcastError> {
        let next = match (&self.on_air, self.state) {
            (Some(current), BleState::Advertising) => current.with_payload(&payload),
            _ => return Err(BroadcastError::NotAdvertising),
        };
        if let Err(rc) = self.platform_set_data(next.as_bytes()) {
            warn!("BLE: adv data update failed (rc={})", rc);
            return Err(BroadcastError::UpdateRejected(rc));
        }
        #[cfg(not(target_os = "espidf"))]
        {
            self.sim_updates += 1;
        }
        self.on_air = Some(next);
        Ok(())
    }

    fn stop(&mut self) {
        if self.state == BleState::Advertising {
            self.platform_stop();
        }
        self.on_air = None;
        self.state = BleState::Stopped;
    }
}
