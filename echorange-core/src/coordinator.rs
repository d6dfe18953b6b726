//! Display coordination
//!
//! Decides, once per render cycle, what the operator sees. The owning task
//! drives it through one cycle at a time:
//!
//! ```text
//! wait trigger (≤ 50ms) ── timeout ──▶ trigger_missed()   → Stale, hold 150ms
//!        │
//!        ▼ trigger_received(now)
//! wait sample  (≤ 50ms) ── timeout ──▶ sample_missed()    → Stale if older than 500ms,
//!        │                                                   else keep the last frame
//!        ▼
//! sample_received(sample)  → Valid, hold 50ms   (≤ 200cm)
//!                          → OutOfRange, hold 150ms
//! ```
//!
//! Staleness depends only on the time since the last reading, never on the
//! value that was read. Every error is handled here by picking a frame;
//! nothing propagates further.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::clock::{with_timeout, Clock};
use crate::measurement::DistanceSample;
use crate::pipeline::{DistanceConsumer, TriggerReceiver};
use crate::policy::{
    ERROR_HOLD_MS, SAMPLE_TIMEOUT_MS, STALE_AFTER_MS, TRIGGER_TIMEOUT_MS, VALID_HOLD_MS,
};

/// What the display should show
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// A trusted reading with its bar
    Valid {
        /// Distance in centimeters
        distance_cm: f32,
        /// Bar length in pixels
        bar_px: u32,
    },
    /// A reading beyond the trusted range
    OutOfRange,
    /// No recent reading
    Stale,
}

/// Conditions the coordinator reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Trigger signal not received within its timeout
    NoTrigger,
    /// No distance sample after a trigger, beyond the staleness window
    NoEcho,
    /// Sample farther than the trusted range
    OutOfRange,
    /// Falling echo edge without a matching rising edge
    SpuriousEdge,
}

/// Result of one coordinator step
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// Redraw with `frame`, then hold for `hold_ms` before the next cycle
    Render {
        frame: Frame,
        hold_ms: u64,
        fault: Option<ErrorKind>,
    },
    /// Leave the previous frame on screen and start the next cycle
    Keep,
}

impl Outcome {
    fn render(frame: Frame, hold_ms: u64, fault: Option<ErrorKind>) -> Self {
        Outcome::Render {
            frame,
            hold_ms,
            fault,
        }
    }

    /// Hold before the next cycle
    pub fn hold_ms(&self) -> u64 {
        match self {
            Outcome::Render { hold_ms, .. } => *hold_ms,
            Outcome::Keep => 0,
        }
    }

    /// Frame to draw, if any
    pub fn frame(&self) -> Option<Frame> {
        match self {
            Outcome::Render { frame, .. } => Some(*frame),
            Outcome::Keep => None,
        }
    }

    /// Condition that led to this outcome, if any
    pub fn fault(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Render { fault, .. } => *fault,
            Outcome::Keep => None,
        }
    }

    /// Sleep for the hold, if any
    pub async fn hold<C: Clock>(&self, clock: &mut C) {
        let ms = self.hold_ms();
        if ms > 0 {
            clock.sleep_ms(ms).await;
        }
    }
}

/// Last rendered classification and the time of the last reading
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayState {
    /// Frame currently on screen (`None` until the first render)
    pub shown: Option<Frame>,
    /// Trigger time of the cycle that produced the last sample (ms)
    pub last_reading_ms: u64,
}

/// Render-cycle state machine
#[derive(Debug, Clone)]
pub struct DisplayCoordinator {
    state: DisplayState,
    /// Trigger time of the cycle in progress (ms)
    cycle_ms: u64,
}

impl Default for DisplayCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayCoordinator {
    /// Create a coordinator
    ///
    /// The last reading time starts at zero, so a sensor that never answers
    /// shows as stale once uptime passes the staleness window.
    pub const fn new() -> Self {
        Self {
            state: DisplayState {
                shown: None,
                last_reading_ms: 0,
            },
            cycle_ms: 0,
        }
    }

    /// Current display state
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Run the waiting half of one render cycle
    ///
    /// Waits at most [`TRIGGER_TIMEOUT_MS`] for the cycle token, then at
    /// most [`SAMPLE_TIMEOUT_MS`] for a sample, and decides. The caller
    /// draws the frame and then calls [`Outcome::hold`].
    pub async fn cycle<M, const S: usize, C>(
        &mut self,
        trigger: &TriggerReceiver<'_, M>,
        distances: &DistanceConsumer<'_, M, S>,
        clock: &mut C,
    ) -> Outcome
    where
        M: RawMutex,
        C: Clock,
    {
        if with_timeout(clock, TRIGGER_TIMEOUT_MS, trigger.wait())
            .await
            .is_none()
        {
            return self.trigger_missed();
        }
        self.trigger_received(clock.now_ms());

        match with_timeout(clock, SAMPLE_TIMEOUT_MS, distances.receive()).await {
            Some(sample) => self.sample_received(sample),
            None => self.sample_missed(),
        }
    }

    /// The trigger wait timed out
    pub fn trigger_missed(&mut self) -> Outcome {
        self.show(Frame::Stale, ERROR_HOLD_MS, Some(ErrorKind::NoTrigger))
    }

    /// A trigger arrived at `now_ms`; a sample is expected next
    pub fn trigger_received(&mut self, now_ms: u64) {
        self.cycle_ms = now_ms;
    }

    /// A sample arrived after the current trigger
    pub fn sample_received(&mut self, sample: DistanceSample) -> Outcome {
        self.state.last_reading_ms = self.cycle_ms;

        if sample.in_range() {
            let frame = Frame::Valid {
                distance_cm: sample.cm(),
                bar_px: sample.bar_px(),
            };
            self.show(frame, VALID_HOLD_MS, None)
        } else {
            self.show(Frame::OutOfRange, ERROR_HOLD_MS, Some(ErrorKind::OutOfRange))
        }
    }

    /// The sample wait after the current trigger timed out
    ///
    /// A single miss inside the staleness window keeps the last frame to
    /// avoid flicker. The stale frame is drawn without a hold.
    pub fn sample_missed(&mut self) -> Outcome {
        if self.reading_age_ms() > STALE_AFTER_MS {
            self.show(Frame::Stale, 0, Some(ErrorKind::NoEcho))
        } else {
            Outcome::Keep
        }
    }

    /// Age of the last reading at the current trigger
    pub fn reading_age_ms(&self) -> u64 {
        self.cycle_ms.saturating_sub(self.state.last_reading_ms)
    }

    fn show(&mut self, frame: Frame, hold_ms: u64, fault: Option<ErrorKind>) -> Outcome {
        self.state.shown = Some(frame);
        Outcome::render(frame, hold_ms, fault)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::VirtualClock;
    use crate::pipeline::Pipeline;
    use crate::policy::MAX_IDLE_CYCLE_MS;
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use proptest::prelude::*;

    fn sample(cm: f32) -> DistanceSample {
        // 58us per cm; exact for the whole-centimeter values used here
        DistanceSample::from_duration((cm * 58.0) as u32)
    }

    #[test]
    fn test_missing_trigger_is_stale() {
        let mut coordinator = DisplayCoordinator::new();
        assert_eq!(
            coordinator.trigger_missed(),
            Outcome::Render {
                frame: Frame::Stale,
                hold_ms: 150,
                fault: Some(ErrorKind::NoTrigger),
            }
        );
        assert_eq!(coordinator.state().shown, Some(Frame::Stale));
    }

    #[test]
    fn test_valid_reading() {
        let mut coordinator = DisplayCoordinator::new();
        coordinator.trigger_received(1_000);

        let outcome = coordinator.sample_received(DistanceSample::from_duration(1160));
        assert_eq!(
            outcome,
            Outcome::Render {
                frame: Frame::Valid {
                    distance_cm: 20.0,
                    bar_px: 12,
                },
                hold_ms: 50,
                fault: None,
            }
        );
        assert_eq!(coordinator.state().last_reading_ms, 1_000);
    }

    #[test]
    fn test_range_limit_is_inclusive() {
        let mut coordinator = DisplayCoordinator::new();
        coordinator.trigger_received(10);

        let outcome = coordinator.sample_received(DistanceSample::from_duration(11_600));
        assert_eq!(
            outcome.frame(),
            Some(Frame::Valid {
                distance_cm: 200.0,
                bar_px: 128,
            })
        );
        assert_eq!(outcome.hold_ms(), 50);
    }

    #[test]
    fn test_out_of_range() {
        let mut coordinator = DisplayCoordinator::new();
        coordinator.trigger_received(10);

        let outcome = coordinator.sample_received(DistanceSample::from_duration(11_601));
        assert_eq!(
            outcome,
            Outcome::Render {
                frame: Frame::OutOfRange,
                hold_ms: 150,
                fault: Some(ErrorKind::OutOfRange),
            }
        );
        // Out of range still counts as a reading
        assert_eq!(coordinator.state().last_reading_ms, 10);
    }

    #[test]
    fn test_single_miss_keeps_frame() {
        let mut coordinator = DisplayCoordinator::new();
        coordinator.trigger_received(100);
        coordinator.sample_received(sample(50.0));

        coordinator.trigger_received(160);
        assert_eq!(coordinator.sample_missed(), Outcome::Keep);
        assert!(matches!(
            coordinator.state().shown,
            Some(Frame::Valid { .. })
        ));
    }

    #[test]
    fn test_cached_reading_goes_stale() {
        let mut coordinator = DisplayCoordinator::new();
        coordinator.trigger_received(100);
        coordinator.sample_received(sample(50.0));

        // Exactly at the window edge the reading is still current
        coordinator.trigger_received(600);
        assert_eq!(coordinator.sample_missed(), Outcome::Keep);

        coordinator.trigger_received(601);
        assert_eq!(
            coordinator.sample_missed(),
            Outcome::Render {
                frame: Frame::Stale,
                hold_ms: 0,
                fault: Some(ErrorKind::NoEcho),
            }
        );
    }

    #[test]
    fn test_silent_sensor_after_boot() {
        let mut coordinator = DisplayCoordinator::new();

        coordinator.trigger_received(400);
        assert_eq!(coordinator.sample_missed(), Outcome::Keep);
        assert_eq!(coordinator.state().shown, None);

        coordinator.trigger_received(510);
        assert_eq!(coordinator.sample_missed().frame(), Some(Frame::Stale));
    }

    #[test]
    fn test_recovers_after_stale() {
        let mut coordinator = DisplayCoordinator::new();
        coordinator.trigger_missed();
        coordinator.trigger_received(2_000);
        assert_eq!(coordinator.sample_missed().frame(), Some(Frame::Stale));

        coordinator.trigger_received(2_010);
        let outcome = coordinator.sample_received(sample(100.0));
        assert_eq!(
            outcome.frame(),
            Some(Frame::Valid {
                distance_cm: 100.0,
                bar_px: 64,
            })
        );
        assert_eq!(coordinator.reading_age_ms(), 0);
    }

    #[test]
    fn test_cycle_without_trigger() {
        let mut pipeline: Pipeline<NoopRawMutex, 4, 4> = Pipeline::new();
        let ports = pipeline.split();
        let mut coordinator = DisplayCoordinator::new();
        let mut clock = VirtualClock::at(0);

        let outcome = block_on(coordinator.cycle(
            &ports.display_trigger,
            &ports.display_in,
            &mut clock,
        ));
        assert_eq!(outcome.frame(), Some(Frame::Stale));
        assert_eq!(outcome.fault(), Some(ErrorKind::NoTrigger));
        assert_eq!(clock.now, TRIGGER_TIMEOUT_MS);

        block_on(outcome.hold(&mut clock));
        assert_eq!(clock.now, TRIGGER_TIMEOUT_MS + ERROR_HOLD_MS);
        assert!(clock.now <= MAX_IDLE_CYCLE_MS);
    }

    #[test]
    fn test_cycle_trigger_without_sample() {
        let mut pipeline: Pipeline<NoopRawMutex, 4, 4> = Pipeline::new();
        let ports = pipeline.split();
        let mut coordinator = DisplayCoordinator::new();

        // Recent reading: the miss keeps the frame
        let mut clock = VirtualClock::at(100);
        ports.trigger.release();
        ports.converter_out.offer(DistanceSample::from_duration(1160)).unwrap();
        let outcome = block_on(coordinator.cycle(
            &ports.display_trigger,
            &ports.display_in,
            &mut clock,
        ));
        assert_eq!(outcome.hold_ms(), VALID_HOLD_MS);
        assert_eq!(clock.now, 100);
        block_on(outcome.hold(&mut clock));

        ports.trigger.release();
        let outcome = block_on(coordinator.cycle(
            &ports.display_trigger,
            &ports.display_in,
            &mut clock,
        ));
        assert_eq!(outcome, Outcome::Keep);
        assert_eq!(clock.now, 150 + SAMPLE_TIMEOUT_MS);

        // Long silence: the same miss now shows stale
        clock.now = 1_000;
        ports.trigger.release();
        let outcome = block_on(coordinator.cycle(
            &ports.display_trigger,
            &ports.display_in,
            &mut clock,
        ));
        assert_eq!(outcome.frame(), Some(Frame::Stale));
        assert_eq!(outcome.fault(), Some(ErrorKind::NoEcho));
        assert_eq!(clock.now, 1_000 + SAMPLE_TIMEOUT_MS);
        assert_eq!(clock.slept, [VALID_HOLD_MS, SAMPLE_TIMEOUT_MS, SAMPLE_TIMEOUT_MS]);
    }

    #[derive(Debug, Clone)]
    enum Step {
        NoTrigger,
        Trigger { gap_ms: u64, reply: Option<u32> },
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::NoTrigger),
            (0u64..400, proptest::option::of(0u32..30_000))
                .prop_map(|(gap_ms, reply)| Step::Trigger { gap_ms, reply }),
        ]
    }

    proptest! {
        /// Whatever the pipeline holds, a cycle waits and holds no longer
        /// than the idle budget, and a missing trigger always shows stale.
        #[test]
        fn prop_cycles_are_bounded(steps in proptest::collection::vec(step(), 1..80)) {
            let mut pipeline: Pipeline<NoopRawMutex, 4, 4> = Pipeline::new();
            let ports = pipeline.split();
            let mut coordinator = DisplayCoordinator::new();
            let mut clock = VirtualClock::default();

            for step in steps {
                let triggered = match step {
                    Step::NoTrigger => false,
                    Step::Trigger { gap_ms, reply } => {
                        clock.now += gap_ms;
                        ports.trigger.release();
                        if let Some(d) = reply {
                            ports.converter_out.offer(DistanceSample::from_duration(d)).unwrap();
                        }
                        true
                    }
                };

                let start = clock.now;
                let outcome = block_on(coordinator.cycle(
                    &ports.display_trigger,
                    &ports.display_in,
                    &mut clock,
                ));
                block_on(outcome.hold(&mut clock));

                prop_assert!(clock.now - start <= MAX_IDLE_CYCLE_MS);
                if !triggered {
                    prop_assert_eq!(outcome.frame(), Some(Frame::Stale));
                    prop_assert_eq!(outcome.fault(), Some(ErrorKind::NoTrigger));
                }
                prop_assert!(ports.display_in.is_empty());
            }
        }

        /// Whether a miss renders stale depends only on elapsed time.
        #[test]
        fn prop_staleness_ignores_value(
            d in 0u32..60_000,
            last in 0u64..10_000,
            age in 0u64..2_000,
        ) {
            let mut coordinator = DisplayCoordinator::new();
            coordinator.trigger_received(last);
            coordinator.sample_received(DistanceSample::from_duration(d));

            coordinator.trigger_received(last + age);
            let outcome = coordinator.sample_missed();
            prop_assert_eq!(outcome.frame() == Some(Frame::Stale), age > STALE_AFTER_MS);
        }
    }
}
