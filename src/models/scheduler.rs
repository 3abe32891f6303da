//! Spaced repetition review scheduling.
//!
//! Intervals follow a graduated schedule rather than a uniform multiplier:
//! - Score 0-2 (failed recall): the repetition cycle restarts at 1 day,
//!   no matter how long the item had been retained.
//! - Score 3-5 (successful recall): 1 day after the first success, 3 days
//!   after the second, then previous interval times the item's ease factor.
//!
//! The ease factor itself is never adjusted by review outcomes. That is a
//! deliberate simplification of classic SM-2, kept as-is.

use chrono::{DateTime, Duration, Utc};

use super::{MemorizedItem, ValidationError};

/// Applies a review with the given recall quality to an item.
///
/// `score` is 0-5 (0 = total failure, 5 = perfect recall); anything above 5
/// is rejected with [`ValidationError::ScoreOutOfRange`]. Grown intervals are
/// rounded half away from zero (`f64::round`), which for the positive values
/// that occur here is the same as rounding half up, so 3 days at ease 2.5
/// grows to 8.
///
/// Pure: returns the updated item, persistence is the caller's job.
pub fn schedule(
    item: &MemorizedItem,
    score: u8,
    now: DateTime<Utc>,
) -> Result<MemorizedItem, ValidationError> {
    if score > 5 {
        return Err(ValidationError::ScoreOutOfRange(score));
    }

    let mut updated = item.clone();
    updated.times_reviewed = item.times_reviewed + 1;
    updated.last_score = score;

    updated.interval_days = if score < 3 {
        // Failed recall restarts the cycle
        1
    } else {
        match updated.times_reviewed {
            1 => 1,
            2 => 3,
            _ => {
                let grown = (item.interval_days as f64 * item.ease_factor).round() as u32;
                // Interval never drops below a day
                grown.max(1)
            }
        }
    };

    updated.next_review_at = now + Duration::days(updated.interval_days as i64);

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item_with(interval_days: u32, times_reviewed: u32) -> MemorizedItem {
        let mut item = MemorizedItem::new("q", "a", "Math", "Algebra", Utc::now());
        item.interval_days = interval_days;
        item.times_reviewed = times_reviewed;
        item
    }

    #[test]
    fn test_failed_recall_resets_interval() {
        for score in 0..3 {
            let item = item_with(15, 6);
            let updated = schedule(&item, score, Utc::now()).unwrap();

            assert_eq!(updated.interval_days, 1);
            assert_eq!(updated.times_reviewed, 7);
            assert_eq!(updated.last_score, score);
        }
    }

    #[test]
    fn test_first_success_is_one_day() {
        let item = item_with(1, 0);
        let updated = schedule(&item, 5, Utc::now()).unwrap();

        assert_eq!(updated.times_reviewed, 1);
        assert_eq!(updated.interval_days, 1);
    }

    #[test]
    fn test_second_success_is_three_days() {
        let item = item_with(1, 1);
        let updated = schedule(&item, 4, Utc::now()).unwrap();

        assert_eq!(updated.times_reviewed, 2);
        assert_eq!(updated.interval_days, 3);
    }

    #[test]
    fn test_third_success_multiplies_by_ease_factor() {
        // 3 * 2.5 = 7.5, rounds half away from zero to 8
        let item = item_with(3, 2);
        let updated = schedule(&item, 4, Utc::now()).unwrap();

        assert_eq!(updated.times_reviewed, 3);
        assert_eq!(updated.interval_days, 8);
    }

    #[test]
    fn test_later_success_keeps_growing() {
        // 8 * 2.5 = 20
        let item = item_with(8, 3);
        let updated = schedule(&item, 3, Utc::now()).unwrap();

        assert_eq!(updated.interval_days, 20);
    }

    #[test]
    fn test_next_review_is_now_plus_interval() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let item = item_with(1, 1);
        let updated = schedule(&item, 5, now).unwrap();

        assert_eq!(updated.interval_days, 3);
        assert_eq!(updated.next_review_at, now + Duration::days(3));
    }

    #[test]
    fn test_ease_factor_is_never_adjusted() {
        let item = item_with(3, 2);
        let after_success = schedule(&item, 5, Utc::now()).unwrap();
        let after_failure = schedule(&item, 0, Utc::now()).unwrap();

        assert_eq!(after_success.ease_factor, item.ease_factor);
        assert_eq!(after_failure.ease_factor, item.ease_factor);
    }

    #[test]
    fn test_out_of_range_score_is_rejected() {
        let item = item_with(1, 0);
        let result = schedule(&item, 6, Utc::now());

        assert_eq!(result.unwrap_err(), ValidationError::ScoreOutOfRange(6));
    }

    #[test]
    fn test_input_item_is_untouched() {
        let item = item_with(3, 2);
        let _ = schedule(&item, 5, Utc::now()).unwrap();

        assert_eq!(item.interval_days, 3);
        assert_eq!(item.times_reviewed, 2);
    }
}
