//! Vertical stacking of the face elements
//!
//! Time sits just above the vertical centre. Date, high/low and icon follow
//! below it, each one padding below the previous element's bottom edge. Every
//! element is centred horizontally on its own width. Missing elements take no
//! space.

use embedded_graphics::{
    geometry::{Point, Size},
    primitives::Rectangle,
};

/// Where each element of one frame was placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceLayout {
    pub time: Rectangle,
    pub date: Rectangle,
    pub high_low: Option<Rectangle>,
    pub icon: Option<Rectangle>,
}

/// Measured sizes of the elements to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measured {
    pub time: Size,
    pub date: Size,
    pub high_low: Option<Size>,
    pub icon: Option<Size>,
}

/// `top_left + size / 2`, i.e. (120, 120) on a 240x240 screen
fn centre(bounds: &Rectangle) -> Point {
    bounds.top_left + Point::new((bounds.size.width / 2) as i32, (bounds.size.height / 2) as i32)
}

fn centred(bounds: &Rectangle, top: i32, size: Size) -> Rectangle {
    let x = centre(bounds).x - (size.width / 2) as i32;
    Rectangle::new(Point::new(x, top), size)
}

fn below(previous: &Rectangle, padding: u32) -> i32 {
    previous.top_left.y + previous.size.height as i32 + padding as i32
}

/// Stack the measured elements inside `bounds`.
pub fn stack(bounds: &Rectangle, padding: u32, measured: &Measured) -> FaceLayout {
    let time_top = centre(bounds).y - measured.time.height as i32;
    let time = centred(bounds, time_top, measured.time);
    let date = centred(bounds, below(&time, padding), measured.date);

    let high_low = measured
        .high_low
        .map(|size| centred(bounds, below(&date, padding), size));

    let last = high_low.as_ref().unwrap_or(&date);
    let icon = measured
        .icon
        .map(|size| centred(bounds, below(last, padding), size));

    FaceLayout {
        time,
        date,
        high_low,
        icon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(240, 240))
    }

    #[test]
    fn elements_stack_below_the_time() {
        let measured = Measured {
            time: Size::new(80, 30),
            date: Size::new(120, 14),
            high_low: Some(Size::new(60, 16)),
            icon: Some(Size::new(24, 24)),
        };
        let layout = stack(&screen(), 10, &measured);

        assert_eq!(layout.time.top_left, Point::new(80, 90));
        assert_eq!(layout.date.top_left, Point::new(60, 130));
        assert_eq!(layout.high_low.unwrap().top_left, Point::new(90, 154));
        assert_eq!(layout.icon.unwrap().top_left, Point::new(108, 180));
    }

    #[test]
    fn icon_moves_up_without_high_low() {
        let measured = Measured {
            time: Size::new(80, 30),
            date: Size::new(120, 14),
            high_low: None,
            icon: Some(Size::new(24, 24)),
        };
        let layout = stack(&screen(), 10, &measured);

        assert_eq!(layout.high_low, None);
        assert_eq!(layout.icon.unwrap().top_left, Point::new(108, 154));
    }

    #[test]
    fn offset_bounds_are_respected() {
        let bounds = Rectangle::new(Point::new(20, 40), Size::new(100, 100));
        let measured = Measured {
            time: Size::new(40, 20),
            date: Size::new(60, 10),
            high_low: None,
            icon: None,
        };
        let layout = stack(&bounds, 4, &measured);

        assert_eq!(layout.time.top_left, Point::new(50, 70));
        assert_eq!(layout.date.top_left, Point::new(40, 94));
        assert_eq!(layout.icon, None);
    }
}
