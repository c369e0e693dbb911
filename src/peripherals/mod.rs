//! PineTime peripherals used by the watch face

pub(crate) mod backlight;
pub(crate) mod button;
pub(crate) mod display;
pub(crate) mod touch;
