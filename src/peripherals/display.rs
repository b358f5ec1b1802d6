//! Display control module for PineTime

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26},
    spim::{self, Spim},
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use embedded_graphics::{
    mono_font::{
        iso_8859_1::{FONT_10X20, FONT_8X13},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};
use embedded_text::{
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
    TextBox,
};
use mipidsi::{models::ST7789, Builder, Orientation};
use profont::PROFONT_24_POINT;
use quoteface::{DisplayState, Field, FieldSet};

use super::backlight::{self, Backlight};

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

const BACKGROUND_COLOR: Rgb565 = Rgb565::WHITE;
const TEXT_COLOR: Rgb565 = Rgb565::BLACK;

/// Where and how a field is drawn
struct Region {
    bounds: Rectangle,
    font: &'static MonoFont<'static>,
    alignment: HorizontalAlignment,
}

impl Region {
    const fn new(
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        font: &'static MonoFont<'static>,
        alignment: HorizontalAlignment,
    ) -> Self {
        Self {
            bounds: Rectangle::new(Point::new(x, y), Size::new(width, height)),
            font,
            alignment,
        }
    }

    fn of(field: Field) -> Self {
        match field {
            Field::Bluetooth => Self::new(12, 4, 108, 28, &FONT_10X20, HorizontalAlignment::Left),
            Field::Battery => Self::new(120, 4, 108, 28, &FONT_10X20, HorizontalAlignment::Right),
            Field::Time => Self::new(0, 60, 240, 72, &PROFONT_24_POINT, HorizontalAlignment::Center),
            // 28 columns by 7 rows, room for the longest inbox quote
            Field::Quote => Self::new(8, 140, 224, 96, &FONT_8X13, HorizontalAlignment::Center),
        }
    }
}

type Lcd<'a, SPI> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;

pub struct Display<'a, SPI>
where
    SPI: spim::Instance,
{
    lcd: Lcd<'a, SPI>,
    backlight: Backlight<'a>,
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
        backlight: Backlight<'a>,
        delay: &mut Delay,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd, backlight };
        display.clear()?;
        Ok(display)
    }

    /// Set the backlight brightness (0–7)
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        self.backlight.set(level)?;
        defmt::info!("Backlight at level {}", self.backlight.get_brightness());
        Ok(())
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), Error> {
        self.lcd.clear(BACKGROUND_COLOR).map_err(|_| Error::Interface)
    }

    /// Redraw the given fields from the display state.
    pub fn draw(&mut self, state: &DisplayState, fields: FieldSet) -> Result<(), Error> {
        for field in fields.iter() {
            self.draw_field(field, state.field(field))?;
        }
        Ok(())
    }

    fn draw_field(&mut self, field: Field, text: &str) -> Result<(), Error> {
        let region = Region::of(field);

        // Overwrite the previous text
        self.lcd
            .fill_solid(&region.bounds, BACKGROUND_COLOR)
            .map_err(|_| Error::Interface)?;
        if text.is_empty() {
            return Ok(());
        }

        let character_style = MonoTextStyle::new(region.font, TEXT_COLOR);
        let textbox_style = TextBoxStyleBuilder::new()
            .alignment(region.alignment)
            .vertical_alignment(VerticalAlignment::Middle)
            .build();

        TextBox::with_textbox_style(text, region.bounds, character_style, textbox_style)
            .draw(&mut self.lcd)
            .map_err(|_| Error::Interface)?;
        Ok(())
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    /// Display controller did not come up
    Init,
    /// SPI transfer failed
    Interface,
    Backlight(backlight::Error),
}

impl From<backlight::Error> for Error {
    fn from(err: backlight::Error) -> Self {
        Self::Backlight(err)
    }
}
