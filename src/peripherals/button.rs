//! Button control module for PineTime

use debouncr::{debounce_2, Debouncer, Edge, Repeat2};
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_13, P0_15},
};
use embassy_time::{Duration, Timer};

pub struct Button<'a> {
    /// Button detection pin (high/low)
    pin_button: Input<'a, P0_13>,
    /// Button enable pin
    pin_enable: Output<'a, P0_15>,
    /// Debouncer for button
    debouncer: Debouncer<u8, Repeat2>,
}

impl<'a> Button<'a> {
    /// Configure button on boot
    pub fn init(pin_button: Input<'a, P0_13>, pin_enable: Output<'a, P0_15>) -> Self {
        Self {
            pin_button,
            pin_enable,
            debouncer: debounce_2(false),
        }
    }

    /// Sample the button once. True on a debounced press.
    pub async fn pressed(&mut self) -> bool {
        // Enable button
        self.pin_enable.set_high();
        // The button needs a short time to give stable outputs
        Timer::after(Duration::from_micros(1)).await;

        let edge = self.debouncer.update(self.pin_button.is_high());

        // Button consumes around 34µA when P0.15 is left high.
        // To reduce current consumption, set it low most of the time.
        self.pin_enable.set_low();

        edge == Some(Edge::Rising)
    }
}
