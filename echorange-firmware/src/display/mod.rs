//! Display hardware
//!
//! Panel drivers implementing [`echorange_display::Surface`].

pub mod ssd1306;

pub use ssd1306::Ssd1306;
