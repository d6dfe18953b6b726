//! Display task
//!
//! One iteration per measurement cycle:
//!
//! ```text
//! wait cycle token (50ms) ──timeout──▶ "no reading", hold 150ms
//!        │
//!        ▼
//! wait distance (50ms) ──timeout──▶ "no reading" once stale, else keep
//!        │
//!        ▼
//! reading or "range > 200cm", hold 50/150ms
//! ```
//!
//! The waits and decisions live in [`DisplayCoordinator::cycle`]; this task
//! owns the clock and the panel.

use defmt::*;

use echorange_core::DisplayCoordinator;
use echorange_display::{render_or_reinit, render_splash, Surface};

use crate::board::Panel;
use crate::channels::{CyclePort, DistanceInPort};
use crate::clock::SystemClock;

/// Display task - turns cycles and samples into frames
#[embassy_executor::task]
pub async fn display_task(mut panel: Panel, cycles: CyclePort, distances: DistanceInPort) {
    info!("Display task started");

    // A failed init is retried by the first render
    match panel.init().await {
        Ok(()) => {
            if let Err(e) = render_splash(&mut panel).await {
                warn!("Splash failed: {}", e);
            }
        }
        Err(e) => error!("Display init failed: {}", e),
    }

    let mut coordinator = DisplayCoordinator::new();
    let mut clock = SystemClock;

    loop {
        let outcome = coordinator.cycle(&cycles, &distances, &mut clock).await;

        match outcome.frame() {
            Some(frame) => {
                if let Some(fault) = outcome.fault() {
                    debug!("Display fault: {}", fault);
                }
                if let Err(e) = render_or_reinit(&mut panel, &frame).await {
                    warn!("Render failed: {}", e);
                }
            }
            None => trace!(
                "Keeping {} ({}ms old)",
                coordinator.state().shown,
                coordinator.reading_age_ms()
            ),
        }

        outcome.hold(&mut clock).await;
    }
}
