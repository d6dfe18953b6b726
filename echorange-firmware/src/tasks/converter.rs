//! Distance conversion task
//!
//! Runs [`DistanceConverter::step`] forever: a bounded wait for a pulse
//! width, conversion, and a drop-on-full forward.

use defmt::*;

use echorange_core::{Conversion, DistanceConverter};

use crate::channels::{DistanceOutPort, DurationInPort};
use crate::clock::SystemClock;

/// Converter task - pulse widths in, distances out
#[embassy_executor::task]
pub async fn converter_task(durations: DurationInPort, distances: DistanceOutPort) {
    info!("Converter task started");

    let mut converter = DistanceConverter::new(durations, distances);
    let mut clock = SystemClock;

    loop {
        match converter.step(&mut clock).await {
            Conversion::Idle => {}
            Conversion::Forwarded(duration, sample) => {
                trace!("{}us -> {}cm", duration, sample.cm())
            }
            Conversion::Dropped(_, sample) => {
                warn!(
                    "Distance queue full, dropped {}cm ({} total)",
                    sample.cm(),
                    converter.dropped()
                );
            }
        }
    }
}
