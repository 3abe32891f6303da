//! Read-side aggregation over a learner's test history.
//!
//! Both functions are pure over the record slice they are handed and
//! recompute from scratch on every call; nothing is cached.

use std::collections::HashMap;

use serde::Serialize;

use super::TestRecord;

/// Summed accuracy for one subject across all its tests.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectAccuracy {
    pub subject: String,
    /// correct / total questions, exactly 0 when the subject has no questions.
    pub accuracy: f64,
    pub total_questions: u32,
}

/// One point of the chronological performance chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PerformancePoint {
    /// 1-based position in creation order.
    pub index: usize,
    /// Percentage of correct answers, 0-100.
    pub value: f64,
    /// Topic of the underlying test.
    pub label: String,
}

/// Groups records by subject and computes per-subject accuracy.
///
/// Weakest subject comes first: the output is sorted ascending by accuracy,
/// with ties broken by subject name so the order is deterministic. A subject
/// whose tests total zero questions gets accuracy 0 rather than dividing by
/// zero.
pub fn accuracy_by_subject(records: &[TestRecord]) -> Vec<SubjectAccuracy> {
    let mut totals: HashMap<&str, (u32, u32)> = HashMap::new();
    for record in records {
        let entry = totals.entry(record.subject.as_str()).or_insert((0, 0));
        entry.0 += record.questions_count;
        entry.1 += record.correct_answers;
    }

    let mut summary: Vec<SubjectAccuracy> = totals
        .into_iter()
        .map(|(subject, (questions, correct))| SubjectAccuracy {
            subject: subject.to_string(),
            accuracy: if questions == 0 {
                0.0
            } else {
                correct as f64 / questions as f64
            },
            total_questions: questions,
        })
        .collect();

    summary.sort_by(|a, b| {
        a.accuracy
            .total_cmp(&b.accuracy)
            .then_with(|| a.subject.cmp(&b.subject))
    });

    summary
}

/// Chronological performance series, one point per record.
///
/// Records are ordered by creation time and numbered from 1; each point
/// carries the score percentage and the record's topic. The iterator is
/// finite and a fresh call restarts from the input.
pub fn performance_series(records: &[TestRecord]) -> impl Iterator<Item = PerformancePoint> + '_ {
    let mut ordered: Vec<&TestRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.created_at);

    ordered.into_iter().enumerate().map(|(i, record)| {
        // A test with no questions plots at zero
        let value = if record.questions_count == 0 {
            0.0
        } else {
            record.correct_answers as f64 / record.questions_count as f64 * 100.0
        };

        PerformancePoint {
            index: i + 1,
            value,
            label: record.topic.clone(),
        }
    })
}
