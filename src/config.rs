//! Watch face configuration
//!
//! Passed explicitly into the engine and the renderer; there are no global
//! paint or font singletons.

use embassy_time::Duration;
use embedded_graphics::{mono_font::MonoFont, pixelcolor::Rgb565};
use profont::{PROFONT_12_POINT, PROFONT_14_POINT, PROFONT_18_POINT, PROFONT_24_POINT};

/// Fonts for one face shape.
#[derive(Clone, Copy)]
pub struct FontSet {
    pub time: &'static MonoFont<'static>,
    pub date: &'static MonoFont<'static>,
    pub high_low: &'static MonoFont<'static>,
}

/// Colours used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Interactive background after an even number of taps
    pub background: Rgb565,
    /// Interactive background after an odd number of taps
    pub background_alt: Rgb565,
    pub time_text: Rgb565,
    pub date_text: Rgb565,
    pub high_low_text: Rgb565,
    pub icon: Rgb565,
    pub ambient_background: Rgb565,
    pub ambient_text: Rgb565,
    pub ambient_secondary_text: Rgb565,
}

/// Watch face configuration
#[derive(Clone, Copy)]
pub struct FaceConfig {
    /// Redraw cadence while visible and interactive
    pub interactive_interval: Duration,
    /// Vertical gap between stacked elements, in pixels
    pub padding: u32,
    pub palette: Palette,
    pub square_fonts: FontSet,
    pub round_fonts: FontSet,
}

impl FaceConfig {
    pub const DEFAULT: Self = Self {
        interactive_interval: Duration::from_millis(1000),
        padding: 10,
        palette: Palette {
            // Light blue (#03A9F4) and its darker variant (#0288D1)
            background: Rgb565::new(0, 42, 30),
            background_alt: Rgb565::new(0, 34, 26),
            time_text: Rgb565::new(31, 63, 31),
            date_text: Rgb565::new(22, 57, 31),
            high_low_text: Rgb565::new(22, 57, 31),
            icon: Rgb565::new(31, 50, 0),
            ambient_background: Rgb565::new(0, 0, 0),
            ambient_text: Rgb565::new(31, 63, 31),
            ambient_secondary_text: Rgb565::new(20, 40, 20),
        },
        square_fonts: FontSet {
            time: &PROFONT_24_POINT,
            date: &PROFONT_12_POINT,
            high_low: &PROFONT_14_POINT,
        },
        round_fonts: FontSet {
            time: &PROFONT_24_POINT,
            date: &PROFONT_14_POINT,
            high_low: &PROFONT_18_POINT,
        },
    };

    /// Font set for the given face shape.
    pub fn fonts(&self, round: bool) -> &FontSet {
        if round {
            &self.round_fonts
        } else {
            &self.square_fonts
        }
    }

    /// Interactive interval in whole milliseconds, never zero.
    pub fn interval_ms(&self) -> i64 {
        i64::try_from(self.interactive_interval.as_millis())
            .unwrap_or(i64::MAX)
            .max(1)
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_one_second() {
        assert_eq!(FaceConfig::DEFAULT.interval_ms(), 1000);
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = FaceConfig {
            interactive_interval: Duration::from_millis(0),
            ..FaceConfig::DEFAULT
        };
        assert_eq!(config.interval_ms(), 1);
    }

    #[test]
    fn shape_selects_font_set() {
        let config = FaceConfig::DEFAULT;
        assert_eq!(
            config.fonts(true).date.character_size,
            PROFONT_14_POINT.character_size
        );
        assert_eq!(
            config.fonts(false).date.character_size,
            PROFONT_12_POINT.character_size
        );
    }
}
