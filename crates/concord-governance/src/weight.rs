//! Vote-weight calculation from membership tenure.
//!
//! Weight = 1 + floor(tenure / 1 week), capped at 5, and 0 until the member
//! has been active for a full day. Pure and deterministic: identical inputs
//! always produce the identical weight.

use crate::params::{MAX_WEIGHT, MEMBERSHIP_REQUIREMENT, WEIGHT_STEP};

/// Compute the vote weight of a member who joined at `joined_at`, as of
/// `now` (both Unix seconds).
///
/// Callers must check that the member is active first; the result for an
/// inactive member's timestamp is meaningless.
pub fn vote_weight(joined_at: u64, now: u64) -> u64 {
    let tenure = now.saturating_sub(joined_at);
    if tenure < MEMBERSHIP_REQUIREMENT {
        return 0;
    }

    (1 + tenure / WEIGHT_STEP).min(MAX_WEIGHT)
}
