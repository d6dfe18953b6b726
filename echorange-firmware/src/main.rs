//! echorange - Ultrasonic Rangefinder Firmware
//!
//! Main firmware binary for RP2040 boards with an HC-SR04-style sensor and
//! a 128x32 SSD1306 panel. Four tasks form a pipeline:
//!
//! ```text
//! trigger ──token──────────────────────────────▶ display
//!    │                                             ▲
//!    ▼ pulse                                       │ distance
//! sensor ──edges──▶ echo ──duration──▶ converter ──┘
//! ```
//!
//! The echo task runs on a high-priority interrupt executor; the rest share
//! the thread executor.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use {defmt_rtt as _, panic_probe as _};

use crate::board::Board;

mod board;
mod channels;
mod clock;
mod display;
mod tasks;

/// Executor for the echo task, preempts everything on the thread executor
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("echorange firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Trigger parked low, echo pulled up, panel on I2C1
    let board = Board::new(p);
    info!("Sensor and panel pins initialized");

    let ports = channels::init();

    // Echo capture must see edges with minimal latency
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high_spawner
        .spawn(tasks::echo_task(board.echo, ports.echo))
        .unwrap();

    spawner
        .spawn(tasks::converter_task(ports.converter_in, ports.converter_out))
        .unwrap();
    spawner
        .spawn(tasks::display_task(board.panel, ports.display_trigger, ports.display_in))
        .unwrap();
    spawner
        .spawn(tasks::trigger_task(board.trigger, ports.trigger))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // All work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
