//! Parking space counter arithmetic.
//!
//! Every parking keeps `0 <= available <= total`. The database enforces the
//! same bound with a CHECK constraint; these helpers produce the messages.

use crate::error::CoreError;

pub const NO_SPACES_MSG: &str = "No available parking spaces";
pub const OVER_CAPACITY_MSG: &str = "Available spaces cannot be more than total spaces";

/// Spaces currently taken.
pub fn occupied(total: i32, available: i32) -> i32 {
    (total - available).max(0)
}

/// Available spaces after changing the capacity from `old_total` to
/// `new_total`, keeping the currently occupied spaces occupied.
///
/// Shrinking below the occupied count clamps to zero rather than failing;
/// the lot simply stays full until enough cars leave.
pub fn recalculate_available(old_total: i32, old_available: i32, new_total: i32) -> i32 {
    (new_total - occupied(old_total, old_available)).max(0)
}

/// Apply a signed change to the available counter, rejecting results
/// outside `[0, total]`.
pub fn apply_delta(available: i32, total: i32, delta: i32) -> Result<i32, CoreError> {
    let next = available
        .checked_add(delta)
        .ok_or_else(|| CoreError::Validation("Space change out of range".into()))?;
    if next < 0 {
        return Err(CoreError::rule(NO_SPACES_MSG));
    }
    if next > total {
        return Err(CoreError::rule(OVER_CAPACITY_MSG));
    }
    Ok(next)
}
