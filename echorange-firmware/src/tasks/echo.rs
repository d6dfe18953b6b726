//! Echo capture task
//!
//! Runs on the interrupt executor so edge timestamps are taken as soon as
//! the GPIO interrupt fires. Never waits on the pipeline.

use defmt::*;
use embassy_time::Instant;

use echorange_core::{Dropped, EchoCapture};
use echorange_hal::EdgeInput;
use echorange_hal_rp2040::EchoPin;

use crate::channels::EchoPort;

/// Log one line per this many dropped durations
const DROP_REPORT_INTERVAL: u32 = 100;

/// Echo task - timestamps edges and forwards pulse widths
#[embassy_executor::task]
pub async fn echo_task(mut pin: EchoPin<'static>, durations: EchoPort) {
    info!("Echo task started");

    let mut capture = EchoCapture::new();

    loop {
        let edge = pin.wait_for_edge().await;
        let now_us = Instant::now().as_micros();

        let (pulse, forwarded) = match capture.handle_edge(edge, now_us, &durations) {
            Ok(Some(pulse)) => (pulse, true),
            Ok(None) => continue,
            Err(Dropped(pulse)) => (pulse, false),
        };

        match pulse.fault() {
            Some(fault) => warn!(
                "{}: {}us ({} total)",
                fault,
                pulse.duration,
                capture.spurious()
            ),
            None => trace!("Echo pulse {}us", pulse.duration),
        }

        if !forwarded && capture.dropped() % DROP_REPORT_INTERVAL == 1 {
            warn!(
                "Duration queue full, dropped {}us ({} total)",
                pulse.duration,
                capture.dropped()
            );
        }
    }
}
