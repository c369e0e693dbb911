//! Default watchface

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    mono_font::MonoTextStyle,
    pixelcolor::Rgb565,
    text::{renderer::TextRenderer, Baseline, Text},
    Drawable,
};

use super::{
    icons::IconSource,
    layout::{self, FaceLayout, Measured},
    Colors, WatchFace,
};
use crate::{config::FaceConfig, error::RenderError, face::Snapshot};

const BUF_LEN: usize = 32;

fn measure(text: &str, style: &MonoTextStyle<'_, Rgb565>) -> Size {
    style
        .measure_string(text, Point::zero(), Baseline::Top)
        .bounding_box
        .size
}

fn draw_label<D>(
    text: &str,
    top_left: Point,
    style: MonoTextStyle<'_, Rgb565>,
    target: &mut D,
) -> Result<(), RenderError>
where
    D: DrawTarget<Color = Rgb565>,
{
    Text::with_baseline(text, top_left, style, Baseline::Top)
        .draw(target)
        .map_err(|_| RenderError::Target)?;
    Ok(())
}

/// Basic default watchface: time, date, high/low and a condition icon
/// stacked in the middle of the screen.
pub struct DefaultWatchface<'c, I> {
    config: &'c FaceConfig,
    icons: I,
    /// Time label buffer
    time_buf: [u8; BUF_LEN],
    /// Date label buffer
    date_buf: [u8; BUF_LEN],
}

impl<'c, I: IconSource> DefaultWatchface<'c, I> {
    pub fn new(config: &'c FaceConfig, icons: I) -> Self {
        Self {
            config,
            icons,
            time_buf: [0; BUF_LEN],
            date_buf: [0; BUF_LEN],
        }
    }
}

impl<I: IconSource> WatchFace for DefaultWatchface<'_, I> {
    fn draw<D>(&mut self, snapshot: &Snapshot<'_>, target: &mut D) -> Result<FaceLayout, RenderError>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let colors = Colors::resolve(&self.config.palette, snapshot);
        let fonts = self.config.fonts(snapshot.is_round());

        let time = snapshot.clock().time_text(&mut self.time_buf)?;
        let date = snapshot.clock().date_text(&mut self.date_buf)?;
        let high_low = snapshot.weather().high_low();
        let icon = snapshot
            .weather()
            .condition_id()
            .and_then(|id| self.icons.icon_size(id).map(|size| (id, size)));

        let time_style = MonoTextStyle::new(fonts.time, colors.time);
        let date_style = MonoTextStyle::new(fonts.date, colors.date);
        let high_low_style = MonoTextStyle::new(fonts.high_low, colors.high_low);

        let measured = Measured {
            time: measure(time, &time_style),
            date: measure(date, &date_style),
            high_low: high_low.map(|text| measure(text, &high_low_style)),
            icon: icon.map(|(_, size)| size),
        };
        let bounds = target.bounding_box();
        let layout = layout::stack(&bounds, self.config.padding, &measured);

        // Background
        target
            .clear(colors.background)
            .map_err(|_| RenderError::Target)?;

        draw_label(time, layout.time.top_left, time_style, target)?;
        draw_label(date, layout.date.top_left, date_style, target)?;
        if let (Some(text), Some(area)) = (high_low, layout.high_low) {
            draw_label(text, area.top_left, high_low_style, target)?;
        }
        if let (Some((id, _)), Some(area)) = (icon, layout.icon) {
            self.icons
                .draw_icon(id, area.top_left, colors.icon, target)
                .map_err(|_| RenderError::Target)?;
        }

        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use embedded_graphics::{geometry::OriginDimensions, Pixel};

    use super::*;
    use crate::{
        face::{
            clock::ClockState,
            weather::{HighLowText, WeatherState},
            DisplayState,
        },
        ui::icons::{BadgeIcon, NoIcons},
    };

    const SIZE: usize = 240;

    struct Frame {
        pixels: Vec<Rgb565>,
    }

    impl Frame {
        fn new() -> Self {
            Self {
                pixels: vec![Rgb565::new(1, 2, 3); SIZE * SIZE],
            }
        }

        fn count(&self, color: Rgb565) -> usize {
            self.pixels.iter().filter(|&&p| p == color).count()
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            Size::new_equal(SIZE as u32)
        }
    }

    impl DrawTarget for Frame {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<P>(&mut self, pixels: P) -> Result<(), Self::Error>
        where
            P: IntoIterator<Item = Pixel<Rgb565>>,
        {
            for Pixel(point, color) in pixels {
                if let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) {
                    if x < SIZE && y < SIZE {
                        self.pixels[y * SIZE + x] = color;
                    }
                }
            }
            Ok(())
        }
    }

    // 2024-03-03 13:05:09 UTC
    fn state() -> DisplayState {
        DisplayState::new(ClockState::new(1_709_471_109_000, FixedOffset::east_opt(0).unwrap()))
    }

    fn with_weather(mut state: DisplayState, id: i32, text: &str) -> DisplayState {
        *state.weather_mut() = WeatherState::new(id, HighLowText::try_from(text).unwrap());
        state
    }

    #[test]
    fn time_and_date_only_without_weather() {
        let config = FaceConfig::DEFAULT;
        let mut face = DefaultWatchface::new(&config, BadgeIcon::default());
        let state = state();
        let mut frame = Frame::new();

        let layout = face.draw(&Snapshot::new(&state), &mut frame).unwrap();
        assert_eq!(layout.high_low, None);
        assert_eq!(layout.icon, None);
        assert!(layout.date.top_left.y >= layout.time.top_left.y + layout.time.size.height as i32 + 10);
        assert!(frame.count(config.palette.time_text) > 0);
        assert_eq!(frame.count(Rgb565::new(1, 2, 3)), 0);
    }

    #[test]
    fn weather_is_stacked_under_date() {
        let config = FaceConfig::DEFAULT;
        let mut face = DefaultWatchface::new(&config, BadgeIcon { diameter: 24 });
        let state = with_weather(state(), 800, "18/9");
        let mut frame = Frame::new();

        let layout = face.draw(&Snapshot::new(&state), &mut frame).unwrap();
        let high_low = layout.high_low.unwrap();
        let icon = layout.icon.unwrap();
        assert_eq!(
            high_low.top_left.y,
            layout.date.top_left.y + layout.date.size.height as i32 + 10
        );
        assert_eq!(icon.top_left.y, high_low.top_left.y + high_low.size.height as i32 + 10);
        assert_eq!(icon.top_left.x, 120 - 12);
        assert!(frame.count(config.palette.icon) > 0);
    }

    #[test]
    fn missing_icon_mapping_omits_icon() {
        let config = FaceConfig::DEFAULT;
        let mut face = DefaultWatchface::new(&config, NoIcons);
        let state = with_weather(state(), 800, "18/9");
        let mut frame = Frame::new();

        let layout = face.draw(&Snapshot::new(&state), &mut frame).unwrap();
        assert!(layout.high_low.is_some());
        assert_eq!(layout.icon, None);
    }

    #[test]
    fn alternate_background_after_tap() {
        let config = FaceConfig::DEFAULT;
        let mut face = DefaultWatchface::new(&config, NoIcons);
        let mut state = state();
        state.toggle_tap();
        let mut frame = Frame::new();

        face.draw(&Snapshot::new(&state), &mut frame).unwrap();
        assert!(frame.count(config.palette.background_alt) > SIZE * SIZE / 2);
        assert_eq!(frame.count(config.palette.background), 0);
    }

    #[test]
    fn ambient_frame_is_black() {
        let config = FaceConfig::DEFAULT;
        let mut face = DefaultWatchface::new(&config, NoIcons);
        let mut state = state();
        state.set_ambient(true);
        let mut frame = Frame::new();

        face.draw(&Snapshot::new(&state), &mut frame).unwrap();
        assert!(frame.count(config.palette.ambient_background) > SIZE * SIZE / 2);
        assert!(frame.count(config.palette.ambient_text) > 0);
    }

    #[test]
    fn round_face_uses_larger_date_font() {
        let config = FaceConfig::DEFAULT;
        let mut face = DefaultWatchface::new(&config, NoIcons);
        let mut square = state();
        let mut round = state();
        round.set_round(true);
        square.set_round(false);

        let square = face.draw(&Snapshot::new(&square), &mut Frame::new()).unwrap();
        let round = face.draw(&Snapshot::new(&round), &mut Frame::new()).unwrap();
        assert!(round.date.size.height > square.date.size.height);
    }
}
