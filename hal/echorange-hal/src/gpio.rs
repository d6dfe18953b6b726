//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Direction of a level transition on an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

impl Edge {
    /// Classify a transition from the level observed right after it
    ///
    /// An edge interrupt does not carry its direction on every chip, so the
    /// line is sampled once the transition has been reported.
    pub fn from_level(high: bool) -> Self {
        if high {
            Edge::Rising
        } else {
            Edge::Falling
        }
    }
}

/// Input pin that can wait for transitions in both directions
///
/// On interrupt-capable pins the wait is woken from the GPIO interrupt,
/// so the waiting task runs as soon as the edge is latched.
#[allow(async_fn_in_trait)]
pub trait EdgeInput: InputPin {
    /// Wait for the next rising or falling edge and report its direction
    async fn wait_for_edge(&mut self) -> Edge;
}
