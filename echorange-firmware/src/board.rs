//! Board wiring
//!
//! Pin choices for a Raspberry Pi Pico with the sensor on GPIO12/13 and a
//! 128x32 SSD1306 on I2C1. Change them here; nothing else names a pin.
//!
//! | Signal | Pin    | Notes                  |
//! |--------|--------|------------------------|
//! | TRIG   | GPIO12 | push-pull, idle low    |
//! | ECHO   | GPIO13 | input, pull-up         |
//! | SDA    | GPIO14 | I2C1                   |
//! | SCL    | GPIO15 | I2C1, 400 kHz          |

use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::i2c::{Async, Config as I2cConfig, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::I2C1;
use embassy_rp::Peripherals;

use echorange_hal_rp2040::{EchoPin, TriggerPin};

use crate::display::Ssd1306;

/// I2C clock for the panel
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Bias on the echo line
pub const ECHO_PULL: Pull = Pull::Up;

bind_interrupts!(pub struct Irqs {
    I2C1_IRQ => I2cInterruptHandler<I2C1>;
});

/// Panel driven by the display task
pub type Panel = Ssd1306<I2c<'static, I2C1, Async>>;

/// Peripherals the pipeline needs, configured
pub struct Board {
    pub trigger: TriggerPin<'static>,
    pub echo: EchoPin<'static>,
    pub panel: Panel,
}

impl Board {
    /// Claim and configure the sensor and panel pins
    pub fn new(p: Peripherals) -> Self {
        let mut i2c_config = I2cConfig::default();
        i2c_config.frequency = I2C_FREQUENCY_HZ;
        let i2c = I2c::new_async(p.I2C1, p.PIN_15, p.PIN_14, Irqs, i2c_config);

        Self {
            trigger: TriggerPin::new(p.PIN_12),
            echo: EchoPin::new(p.PIN_13, ECHO_PULL),
            panel: Ssd1306::new(i2c),
        }
    }
}
