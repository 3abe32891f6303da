//! A memorized item is a question/answer pair a learner is drilling,
//! together with its spaced repetition state.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Starting ease factor for every new item.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemorizedItem {
    pub question: String,
    pub answer: String,
    pub subject: String,
    pub topic: String,
    /// When the item should next be shown. Always `now + interval_days`
    /// as of the most recent review.
    pub next_review_at: DateTime<Utc>,
    /// Current review interval in days, never below 1.
    pub interval_days: u32,
    /// Multiplier applied to the interval from the third successful
    /// review onward. Fixed at creation; reviews never adjust it.
    pub ease_factor: f64,
    pub times_reviewed: u32,
    /// Recall score (0-5) from the most recent review.
    pub last_score: u8,
}

impl MemorizedItem {
    /// Creates a fresh item that is due immediately.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        subject: impl Into<String>,
        topic: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            subject: subject.into(),
            topic: topic.into(),
            next_review_at: now,
            interval_days: 1,
            ease_factor: DEFAULT_EASE_FACTOR,
            times_reviewed: 0,
            last_score: 0,
        }
    }

    /// True when the item is due for review at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_defaults() {
        let now = Utc::now();
        let item = MemorizedItem::new(
            "What is the capital of Poland?",
            "Warsaw",
            "Geography",
            "Europe",
            now,
        );

        assert_eq!(item.question, "What is the capital of Poland?");
        assert_eq!(item.answer, "Warsaw");
        assert_eq!(item.interval_days, 1);
        assert_eq!(item.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(item.times_reviewed, 0);
        assert_eq!(item.last_score, 0);
        assert_eq!(item.next_review_at, now);
    }

    #[test]
    fn test_new_item_is_due_immediately() {
        let now = Utc::now();
        let item = MemorizedItem::new("q", "a", "Math", "Algebra", now);

        assert!(item.is_due(now));
        assert!(item.is_due(now + chrono::Duration::hours(1)));
        assert!(!item.is_due(now - chrono::Duration::hours(1)));
    }
}
