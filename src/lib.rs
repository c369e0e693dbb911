//! Sunshine weather watch face for the PineTime
//!
//! The library holds everything that decides *what* the face shows and *when*
//! it is redrawn, independent of the nRF52 HAL:
//!
//! - [`scheduler`]: boundary-aligned redraw timer state machine
//! - [`sync`]: companion weather updates applied to the display state
//! - [`engine`]: lifecycle signal routing, the single serial entry point
//! - [`face`]: clock, weather and display state models
//! - [`ui`]: `embedded-graphics` renderer for a display snapshot
//! - [`wire`]: `postcard` frames pushed by the companion over BLE
//!
//! The firmware binary (`--features firmware`) wires these to the watch's
//! display, touch panel, button and softdevice.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod engine;
pub mod error;
pub mod face;
pub mod lifecycle;
pub mod scheduler;
pub mod sync;
pub mod ui;
pub mod wire;

pub use config::FaceConfig;
pub use engine::{offer, submit, Engine, Input, InputQueue, ZoneSource};
pub use error::{RenderError, SyncError, TimeError, WireError};
pub use face::{
    clock::{ClockState, TimeReference},
    weather::WeatherState,
    Background, DisplayState, Snapshot,
};
pub use lifecycle::{LifecycleEvent, LifecycleGate, Tap, TapKind};
pub use scheduler::{RenderScheduler, SchedulerState, TimerCommand, TimerHandle};
pub use sync::{DataEvent, DataEventKind, DataMap, DataSyncChannel, DataValue, SyncOutcome};
