//! SSD1306 OLED driver
//!
//! 128x32 SSD1306 panel over async I2C. Drawing goes to a [`Framebuffer`];
//! [`Surface::present`] pushes all four pages in horizontal addressing mode.

use echorange_display::{DisplayError, Framebuffer, Surface, WIDTH};
use embedded_hal_async::i2c::I2c;

/// SSD1306 I2C address (0x3C, or 0x3D with SA0 high)
pub const SSD1306_ADDR: u8 = 0x3C;

const PAGES: u8 = 4;

/// Control byte for a single command
const CONTROL_COMMAND: u8 = 0x00;

/// Control byte for a run of display data
const CONTROL_DATA: u8 = 0x40;

/// SSD1306 commands
#[allow(dead_code)]
mod cmd {
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const DISPLAY_RESUME: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_MEMORY_MODE: u8 = 0x20;
    pub const SET_COLUMN_ADDR: u8 = 0x21;
    pub const SET_PAGE_ADDR: u8 = 0x22;
    pub const SET_SEG_REMAP: u8 = 0xA1;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
}

/// Power-up sequence for a 128x32 module with internal charge pump
const INIT_SEQUENCE: &[u8] = &[
    cmd::DISPLAY_OFF,
    cmd::SET_CLOCK_DIV,
    0x80,
    cmd::SET_MUX_RATIO,
    0x1F, // 32 lines
    cmd::SET_DISPLAY_OFFSET,
    0x00,
    cmd::SET_START_LINE,
    cmd::SET_CHARGE_PUMP,
    0x14,
    cmd::SET_MEMORY_MODE,
    0x00, // Horizontal addressing
    cmd::SET_SEG_REMAP,
    cmd::SET_COM_SCAN_DEC,
    cmd::SET_COM_PINS,
    0x02, // Sequential COM, 32-row panels
    cmd::SET_CONTRAST,
    0x8F,
    cmd::SET_PRECHARGE,
    0xF1,
    cmd::SET_VCOM_DETECT,
    0x40,
    cmd::DISPLAY_RESUME,
    cmd::SET_NORMAL,
    cmd::DISPLAY_ON,
];

/// SSD1306 OLED driver
pub struct Ssd1306<I2C> {
    i2c: I2C,
    fb: Framebuffer,
    ready: bool,
}

impl<I2C> Ssd1306<I2C>
where
    I2C: I2c,
{
    /// Create a driver; the panel stays dark until [`Surface::init`]
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            fb: Framebuffer::new(),
            ready: false,
        }
    }

    async fn command(&mut self, c: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(SSD1306_ADDR, &[CONTROL_COMMAND, c])
            .await
            .map_err(|_| DisplayError::Communication)
    }
}

impl<I2C> Surface for Ssd1306<I2C>
where
    I2C: I2c,
{
    async fn init(&mut self) -> Result<(), DisplayError> {
        for &c in INIT_SEQUENCE {
            self.command(c).await?;
        }
        self.ready = true;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.fb.clear();
        Ok(())
    }

    fn draw_text(&mut self, x: i32, y: i32, scale: u8, text: &str) -> Result<(), DisplayError> {
        self.fb.text(x, y, scale, text)
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DisplayError> {
        self.fb.line(x0, y0, x1, y1);
        Ok(())
    }

    async fn present(&mut self) -> Result<(), DisplayError> {
        if !self.ready {
            return Err(DisplayError::NotInitialized);
        }

        // Full-screen window; data then wraps page to page
        for c in [
            cmd::SET_COLUMN_ADDR,
            0,
            (WIDTH - 1) as u8,
            cmd::SET_PAGE_ADDR,
            0,
            PAGES - 1,
        ] {
            self.command(c).await?;
        }

        for page in 0..PAGES as usize {
            let mut data = [0u8; WIDTH + 1];
            data[0] = CONTROL_DATA;
            data[1..].copy_from_slice(self.fb.page(page));
            self.i2c
                .write(SSD1306_ADDR, &data)
                .await
                .map_err(|_| DisplayError::Communication)?;
        }

        Ok(())
    }
}
