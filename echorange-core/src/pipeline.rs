//! Pipeline wiring
//!
//! The pipeline owns the two bounded queues and the trigger signal. It is
//! split exactly once into role handles: each handle is the only way to
//! reach its end of a queue, and none of them is `Clone`, so every queue
//! has one producer and one consumer by construction.
//!
//! ```text
//! EchoCapture ──durations──▶ DistanceConverter ──distances──▶ DisplayCoordinator
//! TriggerScheduler ─────────────trigger──────────────────────▶ DisplayCoordinator
//! ```
//!
//! All producer operations are non-blocking and drop on full. Consumers
//! expose the awaitable receive; the owning task bounds it with a timeout.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender, TrySendError};
use embassy_sync::signal::Signal;

use crate::measurement::{DistanceSample, PulseDuration};

/// Capacity of the echo → converter queue
pub const DURATION_CAPACITY: usize = 32;

/// Capacity of the converter → display queue
pub const DISTANCE_CAPACITY: usize = 32;

/// An item rejected by a full queue
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dropped<T>(pub T);

/// Queues and signal connecting the four pipeline units
pub struct Pipeline<M: RawMutex, const D: usize = DURATION_CAPACITY, const S: usize = DISTANCE_CAPACITY>
{
    durations: Channel<M, PulseDuration, D>,
    distances: Channel<M, DistanceSample, S>,
    trigger: Signal<M, ()>,
}

impl<M: RawMutex, const D: usize, const S: usize> Default for Pipeline<M, D, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const D: usize, const S: usize> Pipeline<M, D, S> {
    /// Create an empty pipeline
    pub const fn new() -> Self {
        Self {
            durations: Channel::new(),
            distances: Channel::new(),
            trigger: Signal::new(),
        }
    }

    /// Hand out the role handles
    ///
    /// Takes `&mut self` so the handles cannot be obtained twice while a
    /// previous set is alive.
    pub fn split(&mut self) -> Ports<'_, M, D, S> {
        let this = &*self;
        Ports {
            echo: Producer::new(this.durations.sender()),
            trigger: TriggerSender {
                signal: &this.trigger,
            },
            converter_in: Consumer::new(this.durations.receiver()),
            converter_out: Producer::new(this.distances.sender()),
            display_trigger: TriggerReceiver {
                signal: &this.trigger,
            },
            display_in: Consumer::new(this.distances.receiver()),
        }
    }
}

/// Role handles produced by [`Pipeline::split`]
pub struct Ports<'a, M: RawMutex, const D: usize, const S: usize> {
    /// Echo capture end of the duration queue
    pub echo: DurationProducer<'a, M, D>,
    /// Trigger scheduler end of the trigger signal
    pub trigger: TriggerSender<'a, M>,
    /// Converter end of the duration queue
    pub converter_in: DurationConsumer<'a, M, D>,
    /// Converter end of the distance queue
    pub converter_out: DistanceProducer<'a, M, S>,
    /// Display end of the trigger signal
    pub display_trigger: TriggerReceiver<'a, M>,
    /// Display end of the distance queue
    pub display_in: DistanceConsumer<'a, M, S>,
}

/// Sending end of a bounded queue with drop-on-full semantics
pub struct Producer<'a, M: RawMutex, T, const N: usize> {
    tx: Sender<'a, M, T, N>,
}

impl<'a, M: RawMutex, T, const N: usize> Producer<'a, M, T, N> {
    fn new(tx: Sender<'a, M, T, N>) -> Self {
        Self { tx }
    }

    /// Enqueue without waiting
    ///
    /// Safe to call from interrupt context. A full queue hands the item
    /// back instead of blocking.
    pub fn offer(&self, item: T) -> Result<(), Dropped<T>> {
        self.tx.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) => Dropped(item),
        })
    }
}

/// Receiving end of a bounded queue
pub struct Consumer<'a, M: RawMutex, T, const N: usize> {
    rx: Receiver<'a, M, T, N>,
}

impl<'a, M: RawMutex, T, const N: usize> Consumer<'a, M, T, N> {
    fn new(rx: Receiver<'a, M, T, N>) -> Self {
        Self { rx }
    }

    /// Wait for the next item
    ///
    /// Unbounded on its own; callers wrap it in a timeout.
    pub async fn receive(&self) -> T {
        self.rx.receive().await
    }

    /// Take the next item if one is queued
    #[cfg(test)]
    pub fn try_receive(&self) -> Option<T> {
        self.rx.try_receive().ok()
    }

    /// Number of items waiting
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if nothing is waiting
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

pub type DurationProducer<'a, M, const N: usize> = Producer<'a, M, PulseDuration, N>;
pub type DurationConsumer<'a, M, const N: usize> = Consumer<'a, M, PulseDuration, N>;
pub type DistanceProducer<'a, M, const N: usize> = Producer<'a, M, DistanceSample, N>;
pub type DistanceConsumer<'a, M, const N: usize> = Consumer<'a, M, DistanceSample, N>;

/// Producer side of the single-slot trigger signal
pub struct TriggerSender<'a, M: RawMutex> {
    signal: &'a Signal<M, ()>,
}

impl<'a, M: RawMutex> TriggerSender<'a, M> {
    /// Announce that a measurement cycle started
    ///
    /// Returns `false` when the previous token is still pending; the
    /// release then coalesces into it.
    pub fn release(&self) -> bool {
        if self.signal.signaled() {
            return false;
        }
        self.signal.signal(());
        true
    }
}

/// Consumer side of the single-slot trigger signal
pub struct TriggerReceiver<'a, M: RawMutex> {
    signal: &'a Signal<M, ()>,
}

impl<'a, M: RawMutex> TriggerReceiver<'a, M> {
    /// Wait for the next cycle token and consume it
    pub async fn wait(&self) {
        self.signal.wait().await
    }

    /// Consume a pending token without waiting
    #[cfg(test)]
    pub fn try_take(&self) -> bool {
        self.signal.try_take().is_some()
    }
}
