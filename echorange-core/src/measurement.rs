//! Time-of-flight conversion
//!
//! A pulse duration is the round-trip time of the ultrasonic burst in
//! microseconds. Dividing by [`US_PER_CM`] gives the one-way distance.

use crate::policy::{BAR_FULL_SCALE_PX, MAX_RANGE_CM, US_PER_CM};

/// Echo pulse width in microseconds (falling edge minus rising edge)
pub type PulseDuration = u32;

/// Distance derived from one pulse duration
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceSample {
    cm: f32,
}

impl DistanceSample {
    /// Convert a pulse duration into a sample
    pub fn from_duration(duration: PulseDuration) -> Self {
        Self {
            cm: distance_cm(duration),
        }
    }

    /// Distance in centimeters
    pub fn cm(&self) -> f32 {
        self.cm
    }

    /// Check whether the sample is within the trusted range
    ///
    /// The limit itself is in range.
    pub fn in_range(&self) -> bool {
        self.cm <= MAX_RANGE_CM
    }

    /// Length of the bar that represents this sample
    pub fn bar_px(&self) -> u32 {
        bar_length(self.cm)
    }
}

/// Distance in centimeters for a round-trip duration in microseconds
pub fn distance_cm(duration: PulseDuration) -> f32 {
    duration as f32 / US_PER_CM
}

/// Map a distance onto the bar width
///
/// Linear over `0..=MAX_RANGE_CM`, truncated toward zero and clamped to
/// `0..=BAR_FULL_SCALE_PX`. NaN maps to zero.
pub fn bar_length(distance_cm: f32) -> u32 {
    let px = distance_cm * BAR_FULL_SCALE_PX as f32 / MAX_RANGE_CM;
    if px >= BAR_FULL_SCALE_PX as f32 {
        BAR_FULL_SCALE_PX
    } else if px > 0.0 {
        px as u32
    } else {
        0
    }
}
