//! GPIO wrappers
//!
//! embassy-rp wakes a task waiting on an input from the GPIO bank
//! interrupt, so an [`EchoPin`] waiter runs straight after the edge.

use echorange_hal::{Edge, EdgeInput, InputPin, OutputPin};
use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;

/// Trigger output, idle low
pub struct TriggerPin<'d> {
    pin: Output<'d>,
}

impl<'d> TriggerPin<'d> {
    /// Configure `pin` as a push-pull output driven low
    pub fn new(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
        }
    }
}

impl OutputPin for TriggerPin<'_> {
    fn set_high(&mut self) {
        self.pin.set_high();
    }

    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}

/// Echo input with both-edge wakeups
pub struct EchoPin<'d> {
    pin: Input<'d>,
}

impl<'d> EchoPin<'d> {
    /// Configure `pin` as an input with the given pull
    pub fn new(pin: Peri<'d, impl Pin>, pull: Pull) -> Self {
        Self {
            pin: Input::new(pin, pull),
        }
    }
}

impl InputPin for EchoPin<'_> {
    fn is_high(&self) -> bool {
        self.pin.is_high()
    }
}

impl EdgeInput for EchoPin<'_> {
    async fn wait_for_edge(&mut self) -> Edge {
        self.pin.wait_for_any_edge().await;
        // Direction is read back from the line once the edge is latched
        Edge::from_level(self.pin.is_high())
    }
}
