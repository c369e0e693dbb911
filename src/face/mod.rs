//! Display state models
//!
//! [`DisplayState`] is owned by the [`Engine`](crate::engine::Engine) and only
//! mutated on its serial context. The renderer sees it through a
//! [`Snapshot`] that cannot outlive one draw call.

use core::ops::Deref;

pub mod clock;
pub mod weather;

use clock::ClockState;
use weather::WeatherState;

/// Background selection for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Background {
    /// Interactive, even number of completed taps
    Primary,
    /// Interactive, odd number of completed taps
    Alternate,
    Ambient,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayState {
    clock: ClockState,
    weather: WeatherState,
    ambient: bool,
    low_bit_ambient: bool,
    round: bool,
    tap_toggle: u32,
}

impl DisplayState {
    pub fn new(clock: ClockState) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    pub fn weather(&self) -> &WeatherState {
        &self.weather
    }

    pub fn is_ambient(&self) -> bool {
        self.ambient
    }

    pub fn low_bit_ambient(&self) -> bool {
        self.low_bit_ambient
    }

    pub fn is_round(&self) -> bool {
        self.round
    }

    pub fn tap_toggle(&self) -> u32 {
        self.tap_toggle
    }

    /// Background for this state; tap parity picks the interactive colour.
    pub fn background(&self) -> Background {
        if self.ambient {
            Background::Ambient
        } else if self.tap_toggle % 2 == 0 {
            Background::Primary
        } else {
            Background::Alternate
        }
    }

    /// Text is drawn without intermediate colours.
    pub fn monochrome(&self) -> bool {
        self.ambient && self.low_bit_ambient
    }

    pub(crate) fn clock_mut(&mut self) -> &mut ClockState {
        &mut self.clock
    }

    pub(crate) fn weather_mut(&mut self) -> &mut WeatherState {
        &mut self.weather
    }

    pub(crate) fn set_ambient(&mut self, ambient: bool) {
        self.ambient = ambient;
    }

    pub(crate) fn set_low_bit_ambient(&mut self, low_bit_ambient: bool) {
        self.low_bit_ambient = low_bit_ambient;
    }

    /// Returns whether the shape changed.
    pub(crate) fn set_round(&mut self, round: bool) -> bool {
        let changed = self.round != round;
        self.round = round;
        changed
    }

    pub(crate) fn toggle_tap(&mut self) {
        self.tap_toggle = self.tap_toggle.wrapping_add(1);
    }
}

/// Read-only view of the display state for one render pass.
pub struct Snapshot<'a> {
    state: &'a DisplayState,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(state: &'a DisplayState) -> Self {
        Self { state }
    }
}

impl Deref for Snapshot<'_> {
    type Target = DisplayState;

    fn deref(&self) -> &DisplayState {
        self.state
    }
}
