//! Experience, leveling, and daily-streak bookkeeping.
//!
//! Both operations are pure: they take the current progress plus an event
//! and return the updated progress, leaving persistence to the caller.

use chrono::{DateTime, Utc};

use super::LearnerProgress;

/// XP awarded per completed item review.
pub const XP_REVIEW: u32 = 2;
/// XP awarded per explanation requested from the content source.
pub const XP_EXPLANATION: u32 = 5;
/// XP awarded when a batch of items is generated.
pub const XP_ITEM_BATCH: u32 = 5;
/// XP awarded when a test is generated and taken.
pub const XP_TEST: u32 = 10;
/// XP awarded for completing a peer challenge.
pub const XP_CHALLENGE: u32 = 15;

const XP_PER_LEVEL: u32 = 100;
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Updates the daily streak for activity happening at `now`.
///
/// The day difference is the floor of elapsed milliseconds over a whole day,
/// so a clock that moved backwards produces a negative count. Same-day
/// activity (difference 0) changes nothing, exactly one day extends the
/// streak, and any other gap restarts it at 1. `last_active_at` moves to
/// `now` whenever the difference is non-zero.
pub fn record_streak(progress: &LearnerProgress, now: DateTime<Utc>) -> LearnerProgress {
    let elapsed_ms = (now - progress.last_active_at).num_milliseconds();
    let day_diff = elapsed_ms.div_euclid(MILLIS_PER_DAY);

    let mut updated = progress.clone();
    match day_diff {
        0 => {}
        1 => {
            updated.streak += 1;
            updated.last_active_at = now;
        }
        _ => {
            updated.streak = 1;
            updated.last_active_at = now;
        }
    }

    updated
}

/// Adds `points` of experience, rolling excess into levels.
///
/// Rollover loops, so one large award can jump several levels at once.
pub fn add_xp(progress: &LearnerProgress, points: u32) -> LearnerProgress {
    let mut updated = progress.clone();
    updated.xp += points;

    while updated.xp >= XP_PER_LEVEL {
        updated.level += 1;
        updated.xp -= XP_PER_LEVEL;
    }

    updated
}
