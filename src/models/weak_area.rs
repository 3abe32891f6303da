//! Weak areas: (subject, topic) pairs where a learner keeps failing recall.
use serde::{Deserialize, Serialize};

/// Running accuracy estimate for one (subject, topic) pair.
///
/// A learner holds at most one record per pair. `accuracy` is a running mean
/// over `attempts` recorded outcomes, updatable from the previous mean and
/// count alone; no raw history is kept.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeakArea {
    pub subject: String,
    pub topic: String,
    /// In [0, 1].
    pub accuracy: f64,
    /// At least 1 once the record exists.
    pub attempts: u32,
}

/// Records a failed recall against the learner's weak areas.
///
/// Callers only invoke this for scores below 3; that policy lives with the
/// caller, not here. Because every recorded outcome is therefore a failure,
/// the running mean only ever decays toward zero: the update folds a zero
/// into the previous mean and never moves it upward. That one-way trajectory
/// is intentional and load-bearing for consumers, so it must not be
/// "corrected" to a general success/failure mean.
///
/// A missing (subject, topic) pair is created with `accuracy = 0`,
/// `attempts = 1`. Weak areas are never removed.
pub fn record_outcome(weak_areas: &mut Vec<WeakArea>, subject: &str, topic: &str, score: u8) {
    debug_assert!(score < 3, "weak areas only record failed recalls");

    match weak_areas
        .iter_mut()
        .find(|area| area.subject == subject && area.topic == topic)
    {
        Some(area) => {
            area.attempts += 1;
            area.accuracy = (area.accuracy * (area.attempts - 1) as f64) / area.attempts as f64;
        }
        None => weak_areas.push(WeakArea {
            subject: subject.to_string(),
            topic: topic.to_string(),
            accuracy: 0.0,
            attempts: 1,
        }),
    }
}
