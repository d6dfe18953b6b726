//! Frame rendering
//!
//! Layout on the 128x32 panel:
//!
//! ```text
//! y=0   20.00 cm                 (or an error message)
//!
//! y=27  ████████████             bar, one pixel per bar_px, from x=0
//! ```

use core::fmt::Write;

use echorange_core::Frame;
use heapless::String;

use crate::backend::{DisplayError, Surface};

/// Text row of the reading or error message
pub const TEXT_Y: i32 = 0;

/// Pixel row of the distance bar
pub const BAR_Y: i32 = 27;

/// Message shown for readings beyond the trusted range
pub const OUT_OF_RANGE_TEXT: &str = "Error: range > 200cm";

/// Message shown when there is no recent reading
pub const STALE_TEXT: &str = "Error: no reading";

/// Product name on the boot splash
pub const SPLASH_TITLE: &str = "echorange";

/// Second splash line
pub const SPLASH_SUBTITLE: &str = "starting...";

/// Draw one frame: clear, draw content, present
pub async fn render<S: Surface>(surface: &mut S, frame: &Frame) -> Result<(), DisplayError> {
    surface.clear()?;

    match *frame {
        Frame::Valid {
            distance_cm,
            bar_px,
        } => {
            let mut text: String<16> = String::new();
            write!(text, "{:.2} cm", distance_cm).map_err(|_| DisplayError::BufferOverflow)?;
            surface.draw_text(0, TEXT_Y, 1, &text)?;

            if bar_px > 0 {
                surface.draw_line(0, BAR_Y, bar_px as i32 - 1, BAR_Y)?;
            }
        }
        Frame::OutOfRange => surface.draw_text(0, TEXT_Y, 1, OUT_OF_RANGE_TEXT)?,
        Frame::Stale => surface.draw_text(0, TEXT_Y, 1, STALE_TEXT)?,
    }

    surface.present().await
}

/// Draw one frame, bringing the panel up first if it is not running
///
/// A panel whose `init` failed earlier reports `NotInitialized`; it gets
/// one `init` and one redraw per call, so it recovers on the first cycle
/// after the fault clears.
pub async fn render_or_reinit<S: Surface>(surface: &mut S, frame: &Frame) -> Result<(), DisplayError> {
    match render(surface, frame).await {
        Err(DisplayError::NotInitialized) => {
            surface.init().await?;
            render(surface, frame).await
        }
        result => result,
    }
}

/// Draw the boot splash
pub async fn render_splash<S: Surface>(surface: &mut S) -> Result<(), DisplayError> {
    surface.clear()?;
    surface.draw_text(0, 0, 2, SPLASH_TITLE)?;
    surface.draw_text(0, 22, 1, SPLASH_SUBTITLE)?;
    surface.present().await
}
