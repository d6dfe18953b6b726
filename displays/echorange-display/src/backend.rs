//! Display surface trait
//!
//! Defines the drawing contract the renderer uses. A surface keeps no
//! application data: each frame is cleared, drawn and presented in full.

/// Display surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with the panel
    Communication,
    /// Text scale without a matching font
    UnsupportedScale,
    /// Formatted text did not fit its buffer
    BufferOverflow,
    /// Drawing before `init`
    NotInitialized,
}

/// Monochrome drawing surface
///
/// Coordinates are pixels from the top-left corner. Drawing goes to an
/// off-screen buffer; nothing is visible until [`Surface::present`].
#[allow(async_fn_in_trait)]
pub trait Surface {
    /// Bring up the panel
    async fn init(&mut self) -> Result<(), DisplayError>;

    /// Blank the off-screen buffer
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// `scale` selects the font size: 1 is the small font, 2 the large one.
    fn draw_text(&mut self, x: i32, y: i32, scale: u8, text: &str) -> Result<(), DisplayError>;

    /// Draw a one-pixel line between two points, both inclusive
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) -> Result<(), DisplayError>;

    /// Push the off-screen buffer to the panel
    async fn present(&mut self) -> Result<(), DisplayError>;
}
