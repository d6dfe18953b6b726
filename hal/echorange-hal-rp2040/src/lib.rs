//! RP2040 implementation of the echorange HAL traits
//!
//! Thin wrappers over embassy-rp GPIO types:
//!
//! - [`TriggerPin`]: push-pull output driving the sensor's trigger input
//! - [`EchoPin`]: edge-interrupt input reading the sensor's echo output

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;

pub use gpio::{EchoPin, TriggerPin};
