//! Echo edge capture
//!
//! Turns the two edges of one echo pulse into a [`PulseDuration`]. The
//! handler runs at interrupt priority: it never blocks and never allocates,
//! and hands the result to the converter with a drop-on-full send.
//!
//! ```text
//!          rising                falling
//!   Idle ─────────▶ ArmedWaitingFall ─────────▶ emit ─▶ Idle
//! ```
//!
//! A falling edge seen while idle (boot, or a rising edge lost to a missed
//! interrupt) still produces a duration, measured from the last rise that
//! was recorded (zero before the first one). That value is meaningless; it
//! is reported as spurious so the caller can log it, but it is not filtered.

use echorange_hal::Edge;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::coordinator::ErrorKind;
use crate::measurement::PulseDuration;
use crate::pipeline::{Dropped, DurationProducer};

/// Capture state between edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureState {
    /// No pulse in progress
    Idle {
        /// Timestamp of the most recent rising edge (µs, 0 before any)
        last_rise_us: u64,
    },
    /// Rising edge seen, waiting for the end of the pulse
    ArmedWaitingFall {
        /// Timestamp of the rising edge (µs)
        rise_us: u64,
    },
}

/// A pulse measured on a falling edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capture {
    /// Pulse width in microseconds
    pub duration: PulseDuration,
    /// The falling edge had no matching rising edge
    pub spurious: bool,
}

impl Capture {
    /// Error classification of this capture, if any
    pub fn fault(&self) -> Option<ErrorKind> {
        self.spurious.then_some(ErrorKind::SpuriousEdge)
    }
}

/// Echo edge state machine
#[derive(Debug, Clone)]
pub struct EchoCapture {
    state: CaptureState,
    /// Falling edges without a matching rise
    spurious: u32,
    /// Pulses lost to a full duration queue
    dropped: u32,
}

impl Default for EchoCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoCapture {
    /// Create a capture in the idle state
    pub const fn new() -> Self {
        Self {
            state: CaptureState::Idle { last_rise_us: 0 },
            spurious: 0,
            dropped: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Spurious falling edges seen so far, forwarded or not
    pub fn spurious(&self) -> u32 {
        self.spurious
    }

    /// Pulses dropped on a full queue so far
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Apply one edge observed at `now_us`
    ///
    /// Returns the measured pulse on a falling edge. A second rising edge
    /// while armed restarts the measurement from the newer edge.
    pub fn on_edge(&mut self, edge: Edge, now_us: u64) -> Option<Capture> {
        match (self.state, edge) {
            (_, Edge::Rising) => {
                self.state = CaptureState::ArmedWaitingFall { rise_us: now_us };
                None
            }
            (CaptureState::ArmedWaitingFall { rise_us }, Edge::Falling) => {
                self.state = CaptureState::Idle {
                    last_rise_us: rise_us,
                };
                Some(Capture {
                    duration: elapsed_us(rise_us, now_us),
                    spurious: false,
                })
            }
            (CaptureState::Idle { last_rise_us }, Edge::Falling) => Some(Capture {
                duration: elapsed_us(last_rise_us, now_us),
                spurious: true,
            }),
        }
    }

    /// Apply an edge and forward any resulting pulse without waiting
    ///
    /// This is the whole interrupt path: a transition plus a non-blocking
    /// send. A full queue drops the pulse and hands the capture back.
    /// Spurious edges are counted whether or not they fit in the queue.
    pub fn handle_edge<M: RawMutex, const N: usize>(
        &mut self,
        edge: Edge,
        now_us: u64,
        durations: &DurationProducer<'_, M, N>,
    ) -> Result<Option<Capture>, Dropped<Capture>> {
        let Some(capture) = self.on_edge(edge, now_us) else {
            return Ok(None);
        };

        if capture.spurious {
            self.spurious = self.spurious.wrapping_add(1);
        }

        match durations.offer(capture.duration) {
            Ok(()) => Ok(Some(capture)),
            Err(Dropped(_)) => {
                self.dropped = self.dropped.wrapping_add(1);
                Err(Dropped(capture))
            }
        }
    }
}

/// Microseconds from `start_us` to `end_us`, never negative
fn elapsed_us(start_us: u64, end_us: u64) -> PulseDuration {
    let us = end_us.saturating_sub(start_us);
    PulseDuration::try_from(us).unwrap_or(PulseDuration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_rise_then_fall() {
        let mut echo = EchoCapture::new();

        assert_eq!(echo.on_edge(Edge::Rising, 1_000), None);
        assert_eq!(
            echo.state(),
            CaptureState::ArmedWaitingFall { rise_us: 1_000 }
        );

        let capture = echo.on_edge(Edge::Falling, 2_160).unwrap();
        assert_eq!(capture.duration, 1_160);
        assert_eq!(capture.fault(), None);
        assert_eq!(
            echo.state(),
            CaptureState::Idle {
                last_rise_us: 1_000
            }
        );
    }

    #[test]
    fn test_fall_at_boot_is_spurious() {
        let mut echo = EchoCapture::new();

        let capture = echo.on_edge(Edge::Falling, 5_000).unwrap();
        assert!(capture.spurious);
        assert_eq!(capture.fault(), Some(ErrorKind::SpuriousEdge));
        assert_eq!(capture.duration, 5_000);
        assert_eq!(echo.state(), CaptureState::Idle { last_rise_us: 0 });
    }

    #[test]
    fn test_repeated_fall_uses_stale_rise() {
        let mut echo = EchoCapture::new();
        echo.on_edge(Edge::Rising, 100);
        echo.on_edge(Edge::Falling, 400);

        // Rising edge lost, second falling edge measured from the old rise
        let capture = echo.on_edge(Edge::Falling, 900).unwrap();
        assert!(capture.spurious);
        assert_eq!(capture.duration, 800);
    }

    #[test]
    fn test_second_rise_rearms() {
        let mut echo = EchoCapture::new();
        echo.on_edge(Edge::Rising, 100);
        echo.on_edge(Edge::Rising, 300);

        let capture = echo.on_edge(Edge::Falling, 350).unwrap();
        assert_eq!(capture.duration, 50);
        assert!(!capture.spurious);
    }

    #[test]
    fn test_duration_never_negative() {
        let mut echo = EchoCapture::new();
        echo.on_edge(Edge::Rising, 1_000);
        let capture = echo.on_edge(Edge::Falling, 900).unwrap();
        assert_eq!(capture.duration, 0);
    }

    #[test]
    fn test_duration_saturates() {
        assert_eq!(elapsed_us(0, u64::MAX), PulseDuration::MAX);
    }

    #[test]
    fn test_handle_edge_forwards_and_drops() {
        let mut pipeline: Pipeline<NoopRawMutex, 1, 1> = Pipeline::new();
        let ports = pipeline.split();
        let mut echo = EchoCapture::new();

        assert_eq!(echo.handle_edge(Edge::Rising, 0, &ports.echo), Ok(None));
        let sent = echo.handle_edge(Edge::Falling, 580, &ports.echo).unwrap();
        assert_eq!(sent.map(|c| c.duration), Some(580));

        // Queue of one is now full; next pulse is dropped, state still advances
        echo.handle_edge(Edge::Rising, 1_000, &ports.echo).unwrap();
        assert_eq!(
            echo.handle_edge(Edge::Falling, 1_058, &ports.echo),
            Err(Dropped(Capture {
                duration: 58,
                spurious: false,
            }))
        );
        assert!(matches!(echo.state(), CaptureState::Idle { .. }));
        assert_eq!(echo.dropped(), 1);

        assert_eq!(ports.converter_in.try_receive(), Some(580));
        assert_eq!(ports.converter_in.try_receive(), None);
    }

    #[test]
    fn test_dropped_spurious_edge_is_counted() {
        let mut pipeline: Pipeline<NoopRawMutex, 1, 1> = Pipeline::new();
        let ports = pipeline.split();
        let mut echo = EchoCapture::new();

        // Spurious edge that fits
        let sent = echo.handle_edge(Edge::Falling, 300, &ports.echo).unwrap();
        assert_eq!(sent.and_then(|c| c.fault()), Some(ErrorKind::SpuriousEdge));
        assert_eq!(echo.spurious(), 1);

        // Queue full: the spurious flag survives the drop
        let Err(Dropped(lost)) = echo.handle_edge(Edge::Falling, 700, &ports.echo) else {
            panic!("queue of one should be full");
        };
        assert!(lost.spurious);
        assert_eq!(lost.duration, 700);
        assert_eq!(echo.spurious(), 2);
        assert_eq!(echo.dropped(), 1);
    }
}
