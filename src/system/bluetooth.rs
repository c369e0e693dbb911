//! Bluetooth module
//!
//! The companion connects as a central and writes two characteristics:
//! postcard weather/zone frames to the sunshine service, and the local time
//! to the standard Current Time Service.

// Core
use core::mem;

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel};

// BLE
use nrf_softdevice::{
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server, peripheral, Connection,
    },
    raw, Config, Softdevice,
};

// Crate
use sunshine_watchface::{
    face::clock::CTS_LEN,
    submit,
    wire::{decode_frame, WireFrame, FRAME_CAPACITY},
    Input, LifecycleEvent,
};

use super::time::WallClock;
use crate::INPUTS;

const DEVICE_NAME: &[u8] = b"Sunshine";

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Incomplete, &[ServiceUuid16::CURRENT_TIME])
    .full_name("Sunshine")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Incomplete, &[ServiceUuid16::CURRENT_TIME])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub cts: CurrentTimeService,
    pub sunshine: SunshineService,
}

#[nrf_softdevice::gatt_service(uuid = "1805")]
pub struct CurrentTimeService {
    #[characteristic(uuid = "2a2b", read, write)]
    pub current_time: [u8; CTS_LEN],
}

#[nrf_softdevice::gatt_service(uuid = "9e7312e0-2354-11eb-9f10-fbc30a62cf38")]
pub struct SunshineService {
    #[characteristic(uuid = "9e7312e1-2354-11eb-9f10-fbc30a62cf38", write)]
    pub frame: heapless::Vec<u8, FRAME_CAPACITY>,
}

pub fn softdevice_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
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
            p_value: DEVICE_NAME.as_ptr() as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// A characteristic write, handed from the GATT callback to the forwarder.
enum Write {
    CurrentTime([u8; CTS_LEN]),
    Frame(heapless::Vec<u8, FRAME_CAPACITY>),
}

/// Writes received but not yet forwarded to the engine
static WRITES: Channel<ThreadModeRawMutex, Write, 4> = Channel::new();

/// Turn one weather characteristic write into engine inputs.
async fn on_frame(bytes: &[u8], clock: WallClock) {
    match decode_frame(bytes) {
        Ok(WireFrame::Data(event)) => submit(&INPUTS, Input::Data(event)).await,
        Ok(frame @ WireFrame::Zone { .. }) => match frame.zone() {
            Some(zone) => {
                clock.set_zone(zone);
                submit(&INPUTS, Input::Lifecycle(LifecycleEvent::TimeZoneChanged)).await;
            }
            None => defmt::warn!("ignoring out of range zone"),
        },
        Err(err) => defmt::warn!("dropping frame: {}", err),
    }
}

async fn on_current_time(bytes: &[u8], clock: WallClock) {
    match clock.set_from_cts(bytes) {
        Ok(()) => submit(&INPUTS, Input::Lifecycle(LifecycleEvent::ClockAdjusted)).await,
        Err(err) => defmt::warn!("invalid current time: {}", err),
    }
}

async fn deliver(write: Write, clock: WallClock) {
    match write {
        Write::CurrentTime(bytes) => on_current_time(&bytes, clock).await,
        Write::Frame(bytes) => on_frame(&bytes, clock).await,
    }
}

/// Forward writes to the engine, waiting for room in its queue.
async fn forward(clock: WallClock) -> ! {
    loop {
        deliver(WRITES.receive().await, clock).await;
    }
}

fn received(write: Write) {
    // The companion resends on its next sync, like any other transport loss
    if WRITES.try_send(write).is_err() {
        defmt::warn!("companion writing faster than the engine drains, write dropped");
    }
}

/// Serve one connection until it drops.
async fn serve(conn: &Connection, server: &Server, clock: WallClock) {
    submit(&INPUTS, Input::Link(true)).await;
    let run = gatt_server::run(conn, server, |event| match event {
        ServerEvent::Cts(CurrentTimeServiceEvent::CurrentTimeWrite(bytes)) => {
            received(Write::CurrentTime(bytes))
        }
        ServerEvent::Sunshine(SunshineServiceEvent::FrameWrite(bytes)) => {
            received(Write::Frame(bytes))
        }
    });
    if let Either::First(reason) = select(run, forward(clock)).await {
        defmt::info!("companion disconnected: {:?}", reason);
    }
    // Writes from the closed connection still count
    while let Ok(write) = WRITES.try_receive() {
        deliver(write, clock).await;
    }
    submit(&INPUTS, Input::Link(false)).await;
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise, serve the companion, repeat.
#[embassy_executor::task]
pub async fn companion_task(sd: &'static Softdevice, server: Server, clock: WallClock) {
    let config = peripheral::Config::default();
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => serve(&conn, &server, clock).await,
            Err(err) => defmt::warn!("advertising failed: {:?}", err),
        }
    }
}
