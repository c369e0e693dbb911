//! Backlight control
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/backlight.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_14, P0_22, P0_23},
};

/// Highest brightness level
pub const MAX_BRIGHTNESS: u8 = 7;

/// Control the backlight.
///
/// There are three active-low backlight pins, each connected to a FET that
/// toggles backlight power through a resistor.
///
/// - Low: 2.2 kΩ
/// - Mid: 100 Ω
/// - High: 30 Ω
///
/// Through combinations of these pins, 7 brightness levels (+ off) can be
/// configured.
pub struct Backlight<'a> {
    low: Output<'a, P0_14>,
    mid: Output<'a, P0_22>,
    high: Output<'a, P0_23>,

    /// The current brightness level (value between 0 and 7).
    brightness: u8,
}

impl<'a> Backlight<'a> {
    /// Initialize the backlight with the specified level (0–7).
    pub fn init(
        low: Output<'a, P0_14>,
        mid: Output<'a, P0_22>,
        high: Output<'a, P0_23>,
        brightness: u8,
    ) -> Self {
        let mut backlight = Self {
            low,
            mid,
            high,
            brightness: 0,
        };
        backlight.set(brightness.min(MAX_BRIGHTNESS));
        backlight
    }

    /// Set the brightness level, clamped to 0 (off) to 7 (max brightness).
    pub fn set(&mut self, brightness: u8) {
        let brightness = brightness.min(MAX_BRIGHTNESS);
        defmt::debug!("Setting backlight brightness to {}", brightness);

        set_active_low(&mut self.low, brightness & 0x01 > 0);
        set_active_low(&mut self.mid, brightness & 0x02 > 0);
        set_active_low(&mut self.high, brightness & 0x04 > 0);
        self.brightness = brightness;
    }

    /// Turn off the backlight.
    pub fn off(&mut self) {
        self.set(0);
    }

    /// Return the current brightness level (value between 0 and 7).
    pub fn brightness(&self) -> u8 {
        self.brightness
    }
}

fn set_active_low<P: embassy_nrf::gpio::Pin>(pin: &mut Output<'_, P>, on: bool) {
    if on {
        pin.set_low();
    } else {
        pin.set_high();
    }
}
