//! Time keeping module for PineTime
//!
//! The watch has no RTC backed wall clock. Wall time is a [`TimeReference`]
//! seeded from the build time and replaced whenever the companion writes the
//! Current Time Service characteristic.

use core::{
    cell::Cell,
    sync::atomic::{AtomicI32, Ordering},
};

use chrono::{FixedOffset, Offset, Utc};
use embassy_sync::blocking_mutex::{raw::ThreadModeRawMutex, Mutex};
use embassy_time::Instant;
use sunshine_watchface::{TimeError, TimeReference, ZoneSource};

// Include build time UTC epoch, in seconds
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

/// Offset used until the companion reports one
const DEFAULT_ZONE_SECS: i32 = 3_600;

static REFERENCE: Mutex<ThreadModeRawMutex, Cell<TimeReference>> = Mutex::new(Cell::new(
    TimeReference::new(UTC_EPOCH * 1_000, Instant::from_ticks(0)),
));
static ZONE_SECS: AtomicI32 = AtomicI32::new(DEFAULT_ZONE_SECS);

/// Shared wall clock and zone.
#[derive(Clone, Copy, Default)]
pub struct WallClock;

impl WallClock {
    /// Current reference
    pub fn reference(&self) -> TimeReference {
        REFERENCE.lock(Cell::get)
    }

    /// Wall-clock milliseconds now
    pub fn now_ms(&self) -> i64 {
        self.reference().wall_ms(Instant::now())
    }

    /// Take the time from Current Time Service bytes.
    pub fn set_from_cts(&self, bytes: &[u8]) -> Result<(), TimeError> {
        let reference = TimeReference::from_cts_bytes(bytes, self.current_zone(), Instant::now())?;
        REFERENCE.lock(|cell| cell.set(reference));
        defmt::info!("wall clock set, now {=i64} ms", self.now_ms());
        Ok(())
    }

    /// Record the phone's offset.
    pub fn set_zone(&self, zone: FixedOffset) {
        ZONE_SECS.store(zone.local_minus_utc(), Ordering::Relaxed);
    }
}

impl ZoneSource for WallClock {
    fn current_zone(&self) -> FixedOffset {
        let secs = ZONE_SECS.load(Ordering::Relaxed);
        FixedOffset::east_opt(secs).unwrap_or(Utc.fix())
    }
}
