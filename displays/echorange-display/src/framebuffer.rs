//! Monochrome framebuffer
//!
//! 1 bit per pixel, organized in 8-pixel-tall pages the way SSD1306-class
//! controllers expect: byte `page * WIDTH + x`, bit `y % 8`.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::{Baseline, Text};

use crate::backend::DisplayError;

/// Panel width in pixels
pub const WIDTH: usize = 128;

/// Panel height in pixels
pub const HEIGHT: usize = 32;

/// Number of 8-pixel pages
pub const PAGES: usize = HEIGHT / 8;

/// Off-screen pixel buffer
#[derive(Clone)]
pub struct Framebuffer {
    buffer: [u8; WIDTH * PAGES],
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framebuffer {
    /// Create a blank framebuffer
    pub const fn new() -> Self {
        Self {
            buffer: [0; WIDTH * PAGES],
        }
    }

    /// Blank every pixel
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    /// Set one pixel; out-of-bounds coordinates are clipped
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let idx = (y / 8) * WIDTH + x;
        let mask = 1 << (y % 8);
        if on {
            self.buffer[idx] |= mask;
        } else {
            self.buffer[idx] &= !mask;
        }
    }

    /// Read one pixel; out-of-bounds reads as off
    pub fn pixel(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= WIDTH as i32 || y >= HEIGHT as i32 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        self.buffer[(y / 8) * WIDTH + x] & (1 << (y % 8)) != 0
    }

    /// Draw text with its top-left corner at (`x`, `y`)
    pub fn text(&mut self, x: i32, y: i32, scale: u8, text: &str) -> Result<(), DisplayError> {
        let style = MonoTextStyle::new(font_for_scale(scale)?, BinaryColor::On);
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(self)
            .ok();
        Ok(())
    }

    /// Draw a one-pixel line, both endpoints included
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
            .draw(self)
            .ok();
    }

    /// One page of pixel data, left to right
    pub fn page(&self, page: usize) -> &[u8] {
        &self.buffer[page * WIDTH..(page + 1) * WIDTH]
    }

    /// Number of pixels currently on
    pub fn lit(&self) -> u32 {
        self.buffer.iter().map(|b| b.count_ones()).sum()
    }
}

fn font_for_scale(scale: u8) -> Result<&'static MonoFont<'static>, DisplayError> {
    match scale {
        1 => Ok(&FONT_6X10),
        2 => Ok(&FONT_10X20),
        _ => Err(DisplayError::UnsupportedScale),
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point.x, point.y, color.is_on());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_layout() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(3, 10, true);

        // y=10 lives in page 1, bit 2
        assert_eq!(fb.page(1)[3], 0b0000_0100);
        assert!(fb.pixel(3, 10));
        assert_eq!(fb.lit(), 1);

        fb.set_pixel(3, 10, false);
        assert_eq!(fb.lit(), 0);
    }

    #[test]
    fn test_clipping() {
        let mut fb = Framebuffer::new();
        fb.set_pixel(-1, 0, true);
        fb.set_pixel(128, 0, true);
        fb.set_pixel(0, 32, true);
        assert_eq!(fb.lit(), 0);
        assert!(!fb.pixel(500, 500));
    }

    #[test]
    fn test_horizontal_line() {
        let mut fb = Framebuffer::new();
        fb.line(0, 27, 11, 27);

        assert_eq!(fb.lit(), 12);
        assert!(fb.pixel(0, 27));
        assert!(fb.pixel(11, 27));
        assert!(!fb.pixel(12, 27));
    }

    #[test]
    fn test_text_stays_in_band() {
        let mut fb = Framebuffer::new();
        fb.text(0, 0, 1, "20.00 cm").unwrap();

        assert!(fb.lit() > 0);
        // 6x10 font drawn from the top never reaches the bar row
        for x in 0..WIDTH as i32 {
            assert!(!fb.pixel(x, 27));
        }
    }

    #[test]
    fn test_unknown_scale() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.text(0, 0, 3, "x"), Err(DisplayError::UnsupportedScale));
        assert_eq!(fb.lit(), 0);
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new();
        fb.line(0, 0, 127, 31);
        assert!(fb.lit() > 0);
        fb.clear();
        assert_eq!(fb.lit(), 0);
    }
}
