//! Answer scoring: correctness is binary, speed earns a bonus.
//!
//! A correct answer scores `20 + seconds_left * 4`, clamped to `[20, 100]`:
//! answering instantly on a 20-second question earns the full 100, while a
//! last-moment correct answer still earns the floor of 20. Incorrect
//! answers score nothing.

use tokio::time::Instant;

/// Minimum bonus for any correct answer.
pub const MIN_BONUS: u32 = 20;

/// Maximum bonus, reached with 20+ whole seconds remaining.
pub const MAX_BONUS: u32 = 100;

/// Points per whole second remaining on the clock.
const POINTS_PER_SECOND: u32 = 4;

/// Whole seconds remaining before `ends_at`, truncated (a round with
/// 2.9 s left pays out for 2). Zero once the deadline has passed, and
/// zero when no round has started (`ends_at` is `None`).
pub fn seconds_left(ends_at: Option<Instant>, now: Instant) -> u64 {
    ends_at.map_or(0, |at| at.saturating_duration_since(now).as_secs())
}

/// The bonus a correct answer earns with `seconds_left` on the clock.
pub fn bonus(seconds_left: u64) -> u32 {
    let secs = u32::try_from(seconds_left).unwrap_or(u32::MAX);
    MIN_BONUS
        .saturating_add(secs.saturating_mul(POINTS_PER_SECOND))
        .clamp(MIN_BONUS, MAX_BONUS)
}
