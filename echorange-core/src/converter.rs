//! Duration to distance forwarding
//!
//! Sits between the echo queue and the display queue. It has no notion of
//! staleness; a timeout on its input simply means there was nothing to
//! convert this time round.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::clock::{with_timeout, Clock};
use crate::measurement::{DistanceSample, PulseDuration};
use crate::pipeline::{DistanceProducer, Dropped, DurationConsumer};
use crate::policy::DURATION_TIMEOUT_MS;

/// Result of one converter step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conversion {
    /// No duration arrived within the timeout
    Idle,
    /// Sample handed to the display queue
    Forwarded(PulseDuration, DistanceSample),
    /// Display queue was full, sample lost
    Dropped(PulseDuration, DistanceSample),
}

/// Converter between the duration and distance queues
pub struct DistanceConverter<'a, M: RawMutex, const D: usize, const S: usize> {
    durations: DurationConsumer<'a, M, D>,
    distances: DistanceProducer<'a, M, S>,
    forwarded: u32,
    dropped: u32,
}

impl<'a, M: RawMutex, const D: usize, const S: usize> DistanceConverter<'a, M, D, S> {
    /// Create a converter from its two queue ends
    pub fn new(durations: DurationConsumer<'a, M, D>, distances: DistanceProducer<'a, M, S>) -> Self {
        Self {
            durations,
            distances,
            forwarded: 0,
            dropped: 0,
        }
    }

    /// Wait for the next duration
    ///
    /// Unbounded; [`DistanceConverter::step`] is the bounded form.
    pub async fn next_duration(&self) -> PulseDuration {
        self.durations.receive().await
    }

    /// One converter iteration
    ///
    /// Waits at most [`DURATION_TIMEOUT_MS`] for a duration, then converts
    /// and forwards it without waiting.
    pub async fn step<C: Clock>(&mut self, clock: &mut C) -> Conversion {
        let Some(duration) = with_timeout(clock, DURATION_TIMEOUT_MS, self.next_duration()).await
        else {
            return Conversion::Idle;
        };

        match self.forward(duration) {
            Ok(sample) => Conversion::Forwarded(duration, sample),
            Err(Dropped(sample)) => Conversion::Dropped(duration, sample),
        }
    }

    /// Convert one duration and pass it on without waiting
    ///
    /// A full display queue drops the sample.
    pub fn forward(&mut self, duration: PulseDuration) -> Result<DistanceSample, Dropped<DistanceSample>> {
        let sample = DistanceSample::from_duration(duration);
        match self.distances.offer(sample) {
            Ok(()) => {
                self.forwarded = self.forwarded.wrapping_add(1);
                Ok(sample)
            }
            Err(dropped) => {
                self.dropped = self.dropped.wrapping_add(1);
                Err(dropped)
            }
        }
    }

    /// Samples handed to the display queue so far
    pub fn forwarded(&self) -> u32 {
        self.forwarded
    }

    /// Samples lost to a full display queue so far
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
