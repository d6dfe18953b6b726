//! Trigger pulse generation
//!
//! One call to [`TriggerScheduler::fire`] is one measurement cycle: a short
//! high pulse on the trigger line followed by the cycle-started token for
//! the display. The owning task calls it once per [`TRIGGER_PERIOD_MS`].
//!
//! [`TRIGGER_PERIOD_MS`]: crate::policy::TRIGGER_PERIOD_MS

use echorange_hal::OutputPin;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::pipeline::TriggerSender;
use crate::policy::TRIGGER_PULSE_US;

/// Periodic trigger pulse generator
pub struct TriggerScheduler<'a, P, D, M: RawMutex> {
    pin: P,
    delay: D,
    trigger: TriggerSender<'a, M>,
    /// Releases that found the previous token still pending
    coalesced: u32,
}

impl<'a, P, D, M> TriggerScheduler<'a, P, D, M>
where
    P: OutputPin,
    D: DelayNs,
    M: RawMutex,
{
    /// Create a scheduler and park the trigger line low
    pub fn new(mut pin: P, delay: D, trigger: TriggerSender<'a, M>) -> Self {
        pin.set_low();
        Self {
            pin,
            delay,
            trigger,
            coalesced: 0,
        }
    }

    /// Emit one trigger pulse and announce the cycle
    ///
    /// The pulse width is held with a busy delay; at 10µs it is far below
    /// the scheduler tick. Returns `false` when the announcement coalesced
    /// into a token the display had not taken yet.
    pub fn fire(&mut self) -> bool {
        self.pin.set_high();
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.pin.set_low();

        let fresh = self.trigger.release();
        if !fresh {
            self.coalesced = self.coalesced.wrapping_add(1);
        }
        fresh
    }

    /// Number of coalesced announcements so far
    pub fn coalesced(&self) -> u32 {
        self.coalesced
    }
}
