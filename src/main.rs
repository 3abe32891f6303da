use progress_tracker::*;

use database::db;
use models::{Difficulty, TestKind, TestRecord};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let conn = db::init_database()?;

    if db::get_all_learners(&conn)?.is_empty() {
        let learner = db::add_learner("demo", &conn)?;

        db::add_item(
            learner,
            "Math",
            "Algebra",
            "What is the quadratic formula?",
            "x = (-b ± √(b² - 4ac)) / 2a",
            &conn,
        )?;
        db::add_item(learner, "Math", "Algebra", "Factor x² - 9", "(x - 3)(x + 3)", &conn)?;
        db::add_item(learner, "Geography", "Europe", "Capital of Poland?", "Warsaw", &conn)?;

        println!("Sample data created!");
    }

    for (learner_id, name) in db::get_all_learners(&conn)? {
        // Login-equivalent: keeps the daily streak moving
        db::record_activity(learner_id, &conn)?;

        let due = db::due_items(learner_id, &conn)?;
        println!("{name} has {} item(s) due for review", due.len());

        for (item_id, item) in due {
            // Alternate pass/fail so repeated runs exercise both paths
            let score = if item.times_reviewed % 2 == 0 { 5 } else { 2 };
            let updated = db::apply_review(learner_id, item_id, score, &conn)?;
            println!(
                "  reviewed '{}' (score {score}), next review in {} day(s)",
                updated.question, updated.interval_days
            );
        }

        if db::load_test_records(learner_id, &conn)?.is_empty() {
            let now = db::get_current_date(&conn)?;
            let sample_tests = [
                TestRecord::new(
                    "Math",
                    "Algebra",
                    TestKind::MultipleChoice,
                    Difficulty::Medium,
                    10,
                    7,
                    now,
                )?,
                TestRecord::new(
                    "Geography",
                    "Europe",
                    TestKind::ShortAnswer,
                    Difficulty::Easy,
                    5,
                    5,
                    now,
                )?,
            ];
            for record in &sample_tests {
                db::record_test_result(learner_id, record, &conn)?;
            }
        }

        let report = db::progress_report(learner_id, &conn)?;
        println!("\n=== Progress for {name} ===");
        println!(
            "Level {} with {} XP, {}-day streak",
            report.level, report.xp, report.streak
        );

        println!("Accuracy by subject (weakest first):");
        for subject in &report.subject_accuracy {
            println!(
                "  - {}: {:.0}% over {} questions",
                subject.subject,
                subject.accuracy * 100.0,
                subject.total_questions
            );
        }

        if !report.weak_areas.is_empty() {
            println!("Weak areas:");
            for area in &report.weak_areas {
                println!(
                    "  - {} / {}: accuracy {:.2} after {} failed attempt(s)",
                    area.subject, area.topic, area.accuracy, area.attempts
                );
            }
        }

        println!("Performance over time:");
        for point in &report.performance {
            println!("  {}. {} - {:.0}%", point.index, point.label, point.value);
        }
    }

    // Move the simulated clock so the next run sees new due items
    db::advance_day(&conn)?;
    println!("\nSimulated day advanced; run again to continue studying.");

    Ok(())
}
