//! Immutable records of completed tests, used for read-side aggregation.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Question format of a generated test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestKind {
    MultipleChoice,
    ShortAnswer,
    TrueFalse,
    CodingProblem,
    Essay,
}

impl TestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::MultipleChoice => "Multiple Choice",
            TestKind::ShortAnswer => "Short Answer",
            TestKind::TrueFalse => "True/False",
            TestKind::CodingProblem => "Coding Problem",
            TestKind::Essay => "Essay",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Multiple Choice" => Some(TestKind::MultipleChoice),
            "Short Answer" => Some(TestKind::ShortAnswer),
            "True/False" => Some(TestKind::TrueFalse),
            "Coding Problem" => Some(TestKind::CodingProblem),
            "Essay" => Some(TestKind::Essay),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Easy" => Some(Difficulty::Easy),
            "Medium" => Some(Difficulty::Medium),
            "Hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// One completed test. Never mutated after creation; aggregation reads these
/// in bulk.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestRecord {
    pub subject: String,
    pub topic: String,
    pub kind: TestKind,
    pub difficulty: Difficulty,
    pub questions_count: u32,
    pub correct_answers: u32,
    pub created_at: DateTime<Utc>,
}

impl TestRecord {
    /// Builds a record, rejecting one that claims more correct answers than
    /// it has questions.
    pub fn new(
        subject: impl Into<String>,
        topic: impl Into<String>,
        kind: TestKind,
        difficulty: Difficulty,
        questions_count: u32,
        correct_answers: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if correct_answers > questions_count {
            return Err(ValidationError::MalformedRecord {
                correct: correct_answers,
                total: questions_count,
            });
        }

        Ok(Self {
            subject: subject.into(),
            topic: topic.into(),
            kind,
            difficulty,
            questions_count,
            correct_answers,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = TestRecord::new(
            "Math",
            "Algebra",
            TestKind::MultipleChoice,
            Difficulty::Medium,
            10,
            7,
            Utc::now(),
        )
        .unwrap();

        assert_eq!(record.subject, "Math");
        assert_eq!(record.questions_count, 10);
        assert_eq!(record.correct_answers, 7);
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        let result = TestRecord::new(
            "Math",
            "Algebra",
            TestKind::TrueFalse,
            Difficulty::Easy,
            5,
            6,
            Utc::now(),
        );

        assert_eq!(
            result.unwrap_err(),
            ValidationError::MalformedRecord {
                correct: 6,
                total: 5
            }
        );
    }

    #[test]
    fn test_kind_and_difficulty_round_trip_as_str() {
        for kind in [
            TestKind::MultipleChoice,
            TestKind::ShortAnswer,
            TestKind::TrueFalse,
            TestKind::CodingProblem,
            TestKind::Essay,
        ] {
            assert_eq!(TestKind::from_str(kind.as_str()), Some(kind));
        }

        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(difficulty.as_str()), Some(difficulty));
        }

        assert_eq!(TestKind::from_str("Oral Exam"), None);
        assert_eq!(Difficulty::from_str("Brutal"), None);
    }
}
