//! Time keeping for the watch face
//!
//! [`TimeReference`] pins a wall-clock instant to the monotonic uptime so
//! wall-clock deadlines can be turned into `embassy_time` instants.
//! [`ClockState`] is the clock shown on the face.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Timelike, Utc};
use embassy_time::Instant;

use crate::error::{RenderError, TimeError};

/// Length of a Current Time Service characteristic value
pub const CTS_LEN: usize = 10;

/// Wall-clock time paired with the uptime it was observed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeReference {
    /// Milliseconds since the Unix epoch
    epoch_ms: i64,
    /// Related system time
    uptime: Instant,
}

impl TimeReference {
    pub const fn new(epoch_ms: i64, uptime: Instant) -> Self {
        Self { epoch_ms, uptime }
    }

    /// Create a reference from Current Time Service data.
    ///
    /// CTS carries local time, so the zone it was taken in is needed to get
    /// back to UTC.
    pub fn from_cts_bytes(
        bytes: &[u8],
        zone: FixedOffset,
        uptime: Instant,
    ) -> Result<Self, TimeError> {
        let cts: &[u8; CTS_LEN] = bytes.try_into().map_err(|_| TimeError::InvalidLength {
            expected: CTS_LEN,
            actual: bytes.len(),
        })?;

        let year = i32::from(u16::from_le_bytes([cts[0], cts[1]]));
        let month = u32::from(cts[2]);
        let day = u32::from(cts[3]);
        let hour = u32::from(cts[4]);
        let min = u32::from(cts[5]);
        let sec = u32::from(cts[6]);
        // cts[7] is the day of week, derivable from the date
        let milli = u32::from(cts[8]) * 1000 / 256; // fractions_256 to milliseconds

        let local = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(TimeError::InvalidDate)?;
        let utc = local - zone.fix();

        Ok(Self {
            epoch_ms: utc.and_utc().timestamp_millis(),
            uptime,
        })
    }

    /// Wall-clock milliseconds at the given uptime.
    pub fn wall_ms(&self, at: Instant) -> i64 {
        self.epoch_ms + uptime_ms(at) - uptime_ms(self.uptime)
    }

    /// Uptime at which the wall clock reads `wall_ms`, clamped to boot.
    pub fn instant_at(&self, wall_ms: i64) -> Instant {
        let uptime = uptime_ms(self.uptime).saturating_add(wall_ms - self.epoch_ms);
        Instant::from_millis(u64::try_from(uptime).unwrap_or(0))
    }
}

fn uptime_ms(at: Instant) -> i64 {
    i64::try_from(at.as_millis()).unwrap_or(i64::MAX)
}

/// The clock shown on the face: current instant and the observed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    instant_ms: i64,
    zone: FixedOffset,
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new(0, Utc.fix())
    }
}

impl ClockState {
    pub const fn new(instant_ms: i64, zone: FixedOffset) -> Self {
        Self { instant_ms, zone }
    }

    pub fn instant_ms(&self) -> i64 {
        self.instant_ms
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub(crate) fn set_instant(&mut self, instant_ms: i64) {
        self.instant_ms = instant_ms;
    }

    /// Update the zone in place. Returns whether it changed.
    pub(crate) fn set_zone(&mut self, zone: FixedOffset) -> bool {
        if self.zone == zone {
            return false;
        }
        self.zone = zone;
        true
    }

    /// Local date and time, `None` if the instant is out of chrono's range.
    pub fn local(&self) -> Option<DateTime<FixedOffset>> {
        self.zone.timestamp_millis_opt(self.instant_ms).single()
    }

    /// Time in `hh:mm`, 12-hour clock, no seconds.
    pub fn time_text<'b>(&self, buf: &'b mut [u8]) -> Result<&'b str, RenderError> {
        let local = self.local().ok_or(RenderError::Clock)?;
        let (_, hour) = local.hour12();
        format_no_std::show(buf, format_args!("{:02}:{:02}", hour, local.minute()))
            .map_err(|_| RenderError::Format)
    }

    /// Date in `E, MMM dd yyyy`, e.g. `Sun, Mar 03 2024`.
    pub fn date_text<'b>(&self, buf: &'b mut [u8]) -> Result<&'b str, RenderError> {
        let local = self.local().ok_or(RenderError::Clock)?;
        format_no_std::show(
            buf,
            format_args!(
                "{}, {} {:02} {}",
                weekday_abbrev(local.weekday().num_days_from_monday()),
                month_abbrev(local.month0()),
                local.day(),
                local.year()
            ),
        )
        .map_err(|_| RenderError::Format)
    }
}

fn weekday_abbrev(days_from_monday: u32) -> &'static str {
    match days_from_monday {
        0 => "Mon",
        1 => "Tue",
        2 => "Wed",
        3 => "Thu",
        4 => "Fri",
        5 => "Sat",
        _ => "Sun",
    }
}

fn month_abbrev(month0: u32) -> &'static str {
    match month0 {
        0 => "Jan",
        1 => "Feb",
        2 => "Mar",
        3 => "Apr",
        4 => "May",
        5 => "Jun",
        6 => "Jul",
        7 => "Aug",
        8 => "Sep",
        9 => "Oct",
        10 => "Nov",
        _ => "Dec",
    }
}
