//! Touch controler module for PineTime

use cst816s::{TouchEvent, TouchGesture, CST816S};
use embassy_embedded_hal::shared_bus::blocking::i2c::I2cDevice;
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_10, P0_28},
    twim::{self, Twim},
};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Delay;
use sunshine_watchface::{Tap, TapKind};

/// Finger down, as reported in `TouchEvent::action`
const ACTION_DOWN: u8 = 0;

pub struct TouchController<'a, TWI>
where
    TWI: twim::Instance,
{
    /// Touchpad instance
    touchpad:
        CST816S<I2cDevice<'a, NoopRawMutex, Twim<'a, TWI>>, Input<'a, P0_28>, Output<'a, P0_10>>,
}

impl<'a, TWI> TouchController<'a, TWI>
where
    TWI: twim::Instance,
{
    /// Configure touch controller on boot
    pub fn init(
        twi: I2cDevice<'a, NoopRawMutex, Twim<'a, TWI>>,
        interrupt_pin: Input<'a, P0_28>,
        reset_pin: Output<'a, P0_10>,
    ) -> Self {
        let mut touchpad = CST816S::new(twi, interrupt_pin, reset_pin);
        if touchpad.setup(&mut Delay).is_err() {
            defmt::warn!("touch controller setup failed");
        }
        Self { touchpad }
    }

    /// Check for new touch event
    pub fn try_event_detected(&mut self) -> Option<TouchEvent> {
        self.touchpad.read_one_touch_event(true)
    }
}

/// Translate a controller event into a tap signal for the face.
///
/// A single click is a completed tap. Other gestures cancel the touch. A bare
/// finger down starts one.
pub fn to_tap(event: &TouchEvent, time_ms: u64) -> Option<Tap> {
    let kind = match event.gesture {
        TouchGesture::SingleClick => TapKind::Tap,
        TouchGesture::None if event.action == ACTION_DOWN => TapKind::Touch,
        TouchGesture::None => return None,
        _ => TapKind::TouchCancel,
    };
    Some(Tap {
        kind,
        x: event.x,
        y: event.y,
        time_ms,
    })
}
