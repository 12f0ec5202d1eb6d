//! Daily login streak tracking.

use chrono::NaiveDate;

/// Compute the streak after a login on `today`.
///
/// - Same day as the last login: unchanged (at least 1).
/// - The day after the last login: extended by one.
/// - Any other gap, or no previous login: restarts at 1.
pub fn next_streak(last_login: Option<NaiveDate>, today: NaiveDate, current: i32) -> i32 {
    let Some(last) = last_login else {
        return 1;
    };

    match (today - last).num_days() {
        0 => current.max(1),
        1 => current.max(0) + 1,
        _ => 1,
    }
}
