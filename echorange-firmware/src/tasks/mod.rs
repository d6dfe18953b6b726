//! Embassy async tasks
//!
//! Each pipeline stage runs as its own task and talks to its neighbours
//! only through the ports handed out by [`crate::channels::init`].

pub mod converter;
pub mod display;
pub mod echo;
pub mod trigger;

pub use converter::converter_task;
pub use display::display_task;
pub use echo::echo_task;
pub use trigger::trigger_task;
