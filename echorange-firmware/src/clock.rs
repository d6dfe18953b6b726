//! embassy-time backed clock

use echorange_core::Clock;
use embassy_time::{Instant, Timer};

/// Clock on the RP2040 timer
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn sleep_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
