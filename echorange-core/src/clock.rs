//! Time source for the pipeline units
//!
//! The units never read a clock or start a timer on their own. Tasks pass
//! one in: the firmware backs it with embassy-time, tests with a virtual
//! clock that advances only when a sleep completes.

use core::future::Future;

use embassy_futures::select::{select, Either};

/// Millisecond clock with an async sleep
#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Monotonic milliseconds since boot
    fn now_ms(&self) -> u64;

    /// Resolve after `ms` milliseconds
    async fn sleep_ms(&mut self, ms: u64);
}

/// Await `fut` for at most `timeout_ms`
///
/// Returns `None` on timeout. A future that is ready on its first poll
/// wins even when the timeout is zero.
pub async fn with_timeout<C, F>(clock: &mut C, timeout_ms: u64, fut: F) -> Option<F::Output>
where
    C: Clock,
    F: Future,
{
    match select(fut, clock.sleep_ms(timeout_ms)).await {
        Either::First(out) => Some(out),
        Either::Second(()) => None,
    }
}
