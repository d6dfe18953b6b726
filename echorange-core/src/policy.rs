//! Fixed measurement and display policy
//!
//! These are constants of the domain, not configuration. Timings are in
//! milliseconds unless the name says otherwise.

/// Trigger period
pub const TRIGGER_PERIOD_MS: u64 = 10;

/// Width of the trigger pulse that starts one echo cycle
pub const TRIGGER_PULSE_US: u32 = 10;

/// Bound on the converter's wait for a pulse duration
pub const DURATION_TIMEOUT_MS: u64 = 50;

/// Bound on the coordinator's wait for the trigger signal
pub const TRIGGER_TIMEOUT_MS: u64 = 50;

/// Bound on the coordinator's wait for a distance sample after a trigger
pub const SAMPLE_TIMEOUT_MS: u64 = 50;

/// Age after which the last reading is no longer shown as current
pub const STALE_AFTER_MS: u64 = 500;

/// Hold after rendering a valid reading
pub const VALID_HOLD_MS: u64 = 50;

/// Hold after rendering an error frame
pub const ERROR_HOLD_MS: u64 = 150;

/// Largest distance the sensor is trusted for (inclusive)
pub const MAX_RANGE_CM: f32 = 200.0;

/// Microseconds of round trip per centimeter of distance
pub const US_PER_CM: f32 = 58.0;

/// Bar length at full scale, equal to the display width
pub const BAR_FULL_SCALE_PX: u32 = 128;

/// Longest a coordinator cycle can take when no data arrives at all
///
/// Trigger wait, sample wait, then the error hold.
pub const MAX_IDLE_CYCLE_MS: u64 = TRIGGER_TIMEOUT_MS + SAMPLE_TIMEOUT_MS + ERROR_HOLD_MS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_cycle_budget() {
        assert!(TRIGGER_TIMEOUT_MS + SAMPLE_TIMEOUT_MS <= 100);
        assert_eq!(MAX_IDLE_CYCLE_MS, 250);
    }

    #[test]
    fn test_valid_refreshes_faster_than_errors() {
        assert!(VALID_HOLD_MS < ERROR_HOLD_MS);
    }
}
