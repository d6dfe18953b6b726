//! Trigger task
//!
//! Fires one trigger pulse per period and announces the cycle to the
//! display task.

use defmt::*;
use embassy_time::{Delay, Duration, Ticker};

use echorange_core::policy::TRIGGER_PERIOD_MS;
use echorange_core::TriggerScheduler;
use echorange_hal_rp2040::TriggerPin;

use crate::channels::TriggerPort;

/// Cycles between coalescing reports (10s at the default period)
const REPORT_INTERVAL: u32 = 1000;

/// Trigger task - periodic sensor trigger
#[embassy_executor::task]
pub async fn trigger_task(pin: TriggerPin<'static>, trigger: TriggerPort) {
    info!("Trigger task started");

    let mut scheduler = TriggerScheduler::new(pin, Delay, trigger);
    let mut ticker = Ticker::every(Duration::from_millis(TRIGGER_PERIOD_MS));
    let mut cycles: u32 = 0;

    loop {
        scheduler.fire();

        cycles = cycles.wrapping_add(1);
        if cycles % REPORT_INTERVAL == 0 {
            debug!(
                "Trigger: {} cycles, {} announcements coalesced",
                cycles,
                scheduler.coalesced()
            );
        }

        ticker.next().await;
    }
}
