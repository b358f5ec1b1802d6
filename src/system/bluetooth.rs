//! Bluetooth module
//!
//! The companion app talks to the watchface through one custom GATT service:
//! `inbox` takes an encoded message dictionary, `time` a Current Time Service
//! record. The standard battery service is exposed next to it.

// Core
use core::mem;

// BLE
use heapless::Vec;
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server,
    },
    raw, Config,
};
use quoteface::{dictionary::MAX_INBOX_LEN, time::CTS_LEN};

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub face: QuoteFaceService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "6e7a0001-2f3c-4b1a-9d8e-5c0a5f9e7b10")]
pub struct QuoteFaceService {
    /// Encoded message dictionary
    #[characteristic(uuid = "6e7a0002-2f3c-4b1a-9d8e-5c0a5f9e7b10", write)]
    pub inbox: Vec<u8, MAX_INBOX_LEN>,
    /// Current Time Service record
    #[characteristic(uuid = "6e7a0003-2f3c-4b1a-9d8e-5c0a5f9e7b10", write)]
    pub time: [u8; CTS_LEN],
}

/// Data written by the companion app
pub enum Inbound {
    Inbox(Vec<u8, MAX_INBOX_LEN>),
    Time([u8; CTS_LEN]),
}

impl Server {
    /// Sort out the writes the watchface cares about.
    pub fn inbound(event: ServerEvent) -> Option<Inbound> {
        match event {
            ServerEvent::Face(QuoteFaceServiceEvent::InboxWrite(bytes)) => {
                Some(Inbound::Inbox(bytes))
            }
            ServerEvent::Face(QuoteFaceServiceEvent::TimeWrite(bytes)) => Some(Inbound::Time(bytes)),
            ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
                defmt::info!("Battery notifications: {}", notifications);
                None
            }
        }
    }

    /// Publish the battery level through the battery service.
    pub fn set_battery_level(&self, percent: u8) -> Result<(), gatt_server::SetValueError> {
        self.bas.battery_level_set(&percent)
    }
}

pub fn generate_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_XTAL as u8,
            rc_ctiv: 0,
            rc_temp_ctiv: 0,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_20_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: b"PineTime" as *const u8 as _,
            current_len: 8,
            max_len: 8,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}
