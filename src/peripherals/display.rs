//! Display control module for PineTime

use display_interface_spi::SPIInterface;
use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};
use embassy_time::Delay;
use mipidsi::{models::ST7789, Builder, Orientation};
use sunshine_watchface::{
    ui::{FaceLayout, WatchFace},
    RenderError, Snapshot,
};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct InitError;

/// ST7789 panel
pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
}

impl<'a, SPI> Display<'a, SPI>
where
    SPI: spim::Instance,
{
    /// Initialize the display
    pub fn init(
        spim: Spim<'a, SPI>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
    ) -> Result<Self, InitError> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(&mut Delay, Some(rst))
            .map_err(|_| InitError)?;

        Ok(Self { lcd })
    }

    /// Draw one frame of the watch face
    pub fn render<F: WatchFace>(
        &mut self,
        face: &mut F,
        snapshot: &Snapshot<'_>,
    ) -> Result<FaceLayout, RenderError> {
        face.draw(snapshot, &mut self.lcd)
    }
}
