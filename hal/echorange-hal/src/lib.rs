//! echorange Hardware Abstraction Layer
//!
//! This crate defines the digital I/O traits the measurement pipeline is
//! written against. Chip-specific crates implement them, so the pipeline
//! logic in `echorange-core` runs unchanged on the target and in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  echorange-core / echorange-firmware    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  echorange-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ echorange-hal-    │
//!           │     rp2040        │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - trigger line
//! - [`gpio::InputPin`], [`gpio::EdgeInput`] - echo line

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

// Re-export key traits at crate root for convenience
pub use gpio::{Edge, EdgeInput, InputPin, OutputPin};
