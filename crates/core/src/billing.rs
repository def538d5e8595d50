//! Parking duration and charge arithmetic.
//!
//! Both values round *up* to two decimals: a driver is never billed for less
//! time than they stayed. Durations are computed on integer milliseconds so
//! the hundredth-of-an-hour boundary (36 seconds) is exact.

use serde::Serialize;

use crate::types::Timestamp;

/// Milliseconds in one hundredth of an hour (36 seconds).
pub const MILLIS_PER_HUNDREDTH_HOUR: i64 = 36_000;

/// Absorbs binary floating-point noise before rounding up to cents, so that
/// `0.1 * 100.0` does not become eleven cents.
const CENT_EPSILON: f64 = 1e-9;

/// Duration and charge for one stay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeBreakdown {
    pub duration_hours: f64,
    pub charged_amount: f64,
}

/// Elapsed time between `entry` and `exit` in hundredths of an hour,
/// rounded up. Negative spans count as zero.
pub fn duration_hundredths(entry: Timestamp, exit: Timestamp) -> i64 {
    let millis = (exit - entry).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis + MILLIS_PER_HUNDREDTH_HOUR - 1) / MILLIS_PER_HUNDREDTH_HOUR
}

/// Elapsed hours between `entry` and `exit`, rounded up to two decimals,
/// never negative.
pub fn duration_hours(entry: Timestamp, exit: Timestamp) -> f64 {
    duration_hundredths(entry, exit) as f64 / 100.0
}

/// Round a non-negative amount up to whole cents.
pub fn ceil_cents(amount: f64) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    (amount * 100.0 - CENT_EPSILON).ceil() / 100.0
}

/// Charge for `duration_hours` at `hourly_rate`, rounded up to cents.
pub fn calculate_charge(duration_hours: f64, hourly_rate: f64) -> f64 {
    ceil_cents(duration_hours * hourly_rate)
}

/// Duration and charge for a stay from `entry` to `exit`.
pub fn compute_charge(entry: Timestamp, exit: Timestamp, hourly_rate: f64) -> ChargeBreakdown {
    let duration_hours = duration_hours(entry, exit);
    ChargeBreakdown {
        duration_hours,
        charged_amount: calculate_charge(duration_hours, hourly_rate),
    }
}
