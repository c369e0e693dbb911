//! UI definitions module
//! Based on: https://github.com/lupyuen/pinetime-watchface/blob/master/src/lib.rs

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};

use crate::{
    config::Palette,
    error::RenderError,
    face::{Background, DisplayState, Snapshot},
};

mod default_watchface;
pub mod icons;
pub mod layout;

pub use default_watchface::DefaultWatchface;
pub use icons::{BadgeIcon, Condition, IconSource, NoIcons};
pub use layout::FaceLayout;

pub trait WatchFace {
    /// Draw one frame of `snapshot` covering the whole target.
    ///
    /// The snapshot is only borrowed for this call.
    fn draw<D>(&mut self, snapshot: &Snapshot<'_>, target: &mut D) -> Result<FaceLayout, RenderError>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// Colours for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub background: Rgb565,
    pub time: Rgb565,
    pub date: Rgb565,
    pub high_low: Rgb565,
    pub icon: Rgb565,
}

impl Colors {
    /// Pick the palette entries for `state`.
    ///
    /// Low-bit ambient draws every element in the primary ambient colour.
    pub fn resolve(palette: &Palette, state: &DisplayState) -> Self {
        match state.background() {
            Background::Ambient => {
                let secondary = if state.monochrome() {
                    palette.ambient_text
                } else {
                    palette.ambient_secondary_text
                };
                Self {
                    background: palette.ambient_background,
                    time: palette.ambient_text,
                    date: secondary,
                    high_low: secondary,
                    icon: secondary,
                }
            }
            background => Self {
                background: if background == Background::Alternate {
                    palette.background_alt
                } else {
                    palette.background
                },
                time: palette.time_text,
                date: palette.date_text,
                high_low: palette.high_low_text,
                icon: palette.icon,
            },
        }
    }
}
