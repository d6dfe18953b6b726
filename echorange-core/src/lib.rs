//! Board-agnostic measurement pipeline for the ultrasonic rangefinder
//!
//! This crate contains all logic that does not depend on a specific chip:
//!
//! - Fixed timing and range policy
//! - Clock seam for timeouts and holds
//! - Time-of-flight to distance conversion
//! - Echo edge capture state machine
//! - Trigger pulse generation
//! - Duration to distance forwarding
//! - Display coordination (staleness and validity arbitration)
//! - Pipeline wiring with single-producer/single-consumer role handles
//!
//! Every unit is a plain struct driven by its owning task. Bounded waits
//! run against an injected [`Clock`]; executors and the hardware timer
//! live in the firmware.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod converter;
pub mod coordinator;
pub mod echo;
pub mod measurement;
pub mod pipeline;
pub mod policy;
pub mod trigger;

pub use clock::Clock;
pub use converter::{Conversion, DistanceConverter};
pub use coordinator::{DisplayCoordinator, ErrorKind, Frame, Outcome};
pub use echo::{Capture, CaptureState, EchoCapture};
pub use measurement::{bar_length, distance_cm, DistanceSample, PulseDuration};
pub use pipeline::{Dropped, Pipeline};
pub use trigger::TriggerScheduler;
