//! System services: HAL configuration, wall clock and the BLE companion link

pub(crate) mod bluetooth;
pub(crate) mod config;
pub(crate) mod time;
