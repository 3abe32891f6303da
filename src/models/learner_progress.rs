//! Per-learner gamification state: experience, level, and daily streak.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Created once at registration, mutated on every qualifying activity event,
/// kept for as long as the learner exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LearnerProgress {
    /// 0-99 outside the rollover instant; 100 points make a level.
    pub xp: u32,
    /// Starts at 1, only grows.
    pub level: u32,
    /// Consecutive calendar days with recorded activity.
    pub streak: u32,
    pub last_active_at: DateTime<Utc>,
}

impl LearnerProgress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 0,
            last_active_at: now,
        }
    }
}
