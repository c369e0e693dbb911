//! Weather condition icons

use embedded_graphics::{
    geometry::{Point, Size},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
};

/// Coarse condition groups for the companion's condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    Storm,
    LightRain,
    Rain,
    Snow,
    Fog,
    Clear,
    LightClouds,
    Clouds,
}

impl Condition {
    /// Group for a condition code, `None` if it has no icon.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            200..=232 | 761 | 781 => Some(Self::Storm),
            300..=321 => Some(Self::LightRain),
            500..=504 | 520..=531 => Some(Self::Rain),
            511 | 600..=622 => Some(Self::Snow),
            701..=760 => Some(Self::Fog),
            800 => Some(Self::Clear),
            801 => Some(Self::LightClouds),
            802..=804 => Some(Self::Clouds),
            _ => None,
        }
    }
}

/// Looks up and draws the icon for a condition code.
pub trait IconSource {
    /// Size of the icon for `condition_id`, `None` if there is no icon for it.
    fn icon_size(&self, condition_id: i32) -> Option<Size>;

    /// Draw the icon with its top left corner at `top_left`.
    fn draw_icon<D>(
        &self,
        condition_id: i32,
        top_left: Point,
        color: Rgb565,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// Never draws an icon.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn icon_size(&self, _condition_id: i32) -> Option<Size> {
        None
    }

    fn draw_icon<D>(&self, _: i32, _: Point, _: Rgb565, _: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Ok(())
    }
}

/// Round badge per condition group: a filled disc for clear sky, a ring for
/// clouds, a ring with a centre dot for precipitation and storms.
#[derive(Debug, Clone, Copy)]
pub struct BadgeIcon {
    pub diameter: u32,
}

impl Default for BadgeIcon {
    fn default() -> Self {
        Self { diameter: 32 }
    }
}

impl IconSource for BadgeIcon {
    fn icon_size(&self, condition_id: i32) -> Option<Size> {
        Condition::from_id(condition_id).map(|_| Size::new_equal(self.diameter))
    }

    fn draw_icon<D>(
        &self,
        condition_id: i32,
        top_left: Point,
        color: Rgb565,
        target: &mut D,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(condition) = Condition::from_id(condition_id) else {
            return Ok(());
        };
        let badge = Circle::new(top_left, self.diameter);
        let stroke = (self.diameter / 8).max(1);

        match condition {
            Condition::Clear => badge.into_styled(PrimitiveStyle::with_fill(color)).draw(target),
            Condition::LightClouds | Condition::Clouds | Condition::Fog => badge
                .into_styled(PrimitiveStyle::with_stroke(color, stroke))
                .draw(target),
            _ => {
                badge
                    .into_styled(PrimitiveStyle::with_stroke(color, stroke))
                    .draw(target)?;
                let dot = self.diameter / 3;
                Circle::with_center(badge.center(), dot)
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_groups() {
        assert_eq!(Condition::from_id(200), Some(Condition::Storm));
        assert_eq!(Condition::from_id(502), Some(Condition::Rain));
        assert_eq!(Condition::from_id(511), Some(Condition::Snow));
        assert_eq!(Condition::from_id(800), Some(Condition::Clear));
        assert_eq!(Condition::from_id(804), Some(Condition::Clouds));
    }

    #[test]
    fn unknown_codes_have_no_icon() {
        assert_eq!(Condition::from_id(-1), None);
        assert_eq!(Condition::from_id(0), None);
        assert_eq!(Condition::from_id(900), None);
        assert_eq!(BadgeIcon::default().icon_size(-1), None);
        assert_eq!(NoIcons.icon_size(800), None);
    }

    #[test]
    fn badge_has_configured_size() {
        let icons = BadgeIcon { diameter: 24 };
        assert_eq!(icons.icon_size(800), Some(Size::new(24, 24)));
        assert_eq!(icons.icon_size(300), Some(Size::new(24, 24)));
    }
}
