//! Database operations for the study tracker
//!
//! Handles SQLite initialization, CRUD for learners, memorized items, weak
//! areas, and test records, plus the glue that ties a review or test event
//! to the scheduling, weak-area, and gamification updates.
//!
//! A simulated `current_date` row in `app_state` stands in for wall-clock
//! time so intervals and streaks can be exercised without waiting real days.

use chrono::{DateTime, Duration, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, params};
use thiserror::Error;

use crate::models::{
    Difficulty, LearnerProgress, MemorizedItem, PerformancePoint, SubjectAccuracy, TestKind,
    TestRecord, ValidationError, WeakArea, aggregator, gamification, scheduler, weak_area,
};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl ToSql for TestKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TestKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        TestKind::from_str(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for Difficulty {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Difficulty {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Difficulty::from_str(value.as_str()?).ok_or(FromSqlError::InvalidType)
    }
}

fn to_timestamp(at: DateTime<Utc>) -> i64 {
    at.timestamp()
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Opens the tracker database file and creates the schema if needed
pub fn init_database() -> Result<Connection> {
    let conn = Connection::open("study.sqlite3")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Creates all tables and seeds the simulated clock
///
/// Safe to call on an existing database; every statement is idempotent.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS learners (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            xp INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            streak INTEGER NOT NULL DEFAULT 0,
            last_active_at INTEGER NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            learner_id INTEGER NOT NULL,
            subject TEXT NOT NULL,
            topic TEXT NOT NULL,
            question TEXT NOT NULL,
            answer TEXT NOT NULL,
            next_review_at INTEGER NOT NULL,
            interval_days INTEGER NOT NULL DEFAULT 1,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            times_reviewed INTEGER NOT NULL DEFAULT 0,
            last_score INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (learner_id) REFERENCES learners(id),
            UNIQUE(learner_id, question)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS weak_areas (
            learner_id INTEGER NOT NULL,
            subject TEXT NOT NULL,
            topic TEXT NOT NULL,
            accuracy REAL NOT NULL,
            attempts INTEGER NOT NULL,
            PRIMARY KEY (learner_id, subject, topic),
            FOREIGN KEY (learner_id) REFERENCES learners(id)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS test_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            learner_id INTEGER NOT NULL,
            subject TEXT NOT NULL,
            topic TEXT NOT NULL,
            kind TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            questions_count INTEGER NOT NULL,
            correct_answers INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (learner_id) REFERENCES learners(id)
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
        params![Utc::now().timestamp().to_string()],
    )?;

    Ok(())
}

/// Retrieves the simulated current date from the database
pub fn get_current_date(conn: &Connection) -> Result<DateTime<Utc>> {
    let value: String = conn.query_row(
        "SELECT value FROM app_state WHERE key = 'current_date'",
        [],
        |row| row.get(0),
    )?;

    let secs = value.parse::<i64>().unwrap_or(0);
    Ok(from_timestamp(secs))
}

/// Advances the simulated date by 24 hours
pub fn advance_day(conn: &Connection) -> Result<()> {
    let next_day = get_current_date(conn)? + Duration::days(1);

    conn.execute(
        "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
        params![next_day.timestamp().to_string()],
    )?;

    log::debug!("simulated date advanced to {next_day}");
    Ok(())
}

/// Registers a new learner with fresh progress and returns their id
pub fn add_learner(name: &str, conn: &Connection) -> Result<i64> {
    let progress = LearnerProgress::new(get_current_date(conn)?);

    conn.execute(
        "INSERT INTO learners (name, xp, level, streak, last_active_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            progress.xp,
            progress.level,
            progress.streak,
            to_timestamp(progress.last_active_at)
        ],
    )?;

    let learner_id = conn.last_insert_rowid();
    log::info!("learner '{name}' registered with id {learner_id}");
    Ok(learner_id)
}

/// Retrieves all registered learners as (id, name) pairs
pub fn get_all_learners(conn: &Connection) -> Result<Vec<(i64, String)>> {
    let mut stmt = conn.prepare("SELECT id, name FROM learners")?;
    let learners = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<(i64, String)>>>()?;
    Ok(learners)
}

pub fn load_progress(learner_id: i64, conn: &Connection) -> Result<LearnerProgress> {
    let progress = conn.query_row(
        "SELECT xp, level, streak, last_active_at FROM learners WHERE id = ?1",
        params![learner_id],
        |row| {
            Ok(LearnerProgress {
                xp: row.get(0)?,
                level: row.get(1)?,
                streak: row.get(2)?,
                last_active_at: from_timestamp(row.get(3)?),
            })
        },
    )?;
    Ok(progress)
}

pub fn store_progress(learner_id: i64, progress: &LearnerProgress, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE learners SET xp = ?1, level = ?2, streak = ?3, last_active_at = ?4 WHERE id = ?5",
        params![
            progress.xp,
            progress.level,
            progress.streak,
            to_timestamp(progress.last_active_at),
            learner_id
        ],
    )?;
    Ok(())
}

/// Marks the learner active now, updating their streak
///
/// This is the login path: it touches the streak but awards no XP.
pub fn record_activity(learner_id: i64, conn: &Connection) -> Result<LearnerProgress> {
    let now = get_current_date(conn)?;
    let progress = gamification::record_streak(&load_progress(learner_id, conn)?, now);
    store_progress(learner_id, &progress, conn)?;
    Ok(progress)
}

/// Adds a memorized item for a learner, due immediately
///
/// Returns the item id. An item with the same question for the same learner
/// is ignored due to the UNIQUE constraint.
pub fn add_item(
    learner_id: i64,
    subject: &str,
    topic: &str,
    question: &str,
    answer: &str,
    conn: &Connection,
) -> Result<i64> {
    let item = MemorizedItem::new(question, answer, subject, topic, get_current_date(conn)?);

    conn.execute(
        "INSERT OR IGNORE INTO items
            (learner_id, subject, topic, question, answer, next_review_at,
             interval_days, ease_factor, times_reviewed, last_score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            learner_id,
            item.subject,
            item.topic,
            item.question,
            item.answer,
            to_timestamp(item.next_review_at),
            item.interval_days,
            item.ease_factor,
            item.times_reviewed,
            item.last_score
        ],
    )?;

    let item_id: i64 = conn.query_row(
        "SELECT id FROM items WHERE learner_id = ?1 AND question = ?2",
        params![learner_id, question],
        |row| row.get(0),
    )?;

    Ok(item_id)
}

fn item_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemorizedItem> {
    Ok(MemorizedItem {
        subject: row.get("subject")?,
        topic: row.get("topic")?,
        question: row.get("question")?,
        answer: row.get("answer")?,
        next_review_at: from_timestamp(row.get("next_review_at")?),
        interval_days: row.get("interval_days")?,
        ease_factor: row.get("ease_factor")?,
        times_reviewed: row.get("times_reviewed")?,
        last_score: row.get("last_score")?,
    })
}

pub fn load_item(learner_id: i64, item_id: i64, conn: &Connection) -> Result<MemorizedItem> {
    let item = conn.query_row(
        "SELECT subject, topic, question, answer, next_review_at,
                interval_days, ease_factor, times_reviewed, last_score
         FROM items WHERE id = ?1 AND learner_id = ?2",
        params![item_id, learner_id],
        item_from_row,
    )?;
    Ok(item)
}

pub fn store_item(item_id: i64, item: &MemorizedItem, conn: &Connection) -> Result<()> {
    conn.execute(
        "UPDATE items
         SET next_review_at = ?1, interval_days = ?2, ease_factor = ?3,
             times_reviewed = ?4, last_score = ?5
         WHERE id = ?6",
        params![
            to_timestamp(item.next_review_at),
            item.interval_days,
            item.ease_factor,
            item.times_reviewed,
            item.last_score,
            item_id
        ],
    )?;
    Ok(())
}

/// Retrieves items due for review at the simulated current date
///
/// Returns up to 20 (item_id, item) pairs, soonest due first.
pub fn due_items(learner_id: i64, conn: &Connection) -> Result<Vec<(i64, MemorizedItem)>> {
    let now = to_timestamp(get_current_date(conn)?);

    let mut stmt = conn.prepare(
        "SELECT id, subject, topic, question, answer, next_review_at,
                interval_days, ease_factor, times_reviewed, last_score
         FROM items
         WHERE learner_id = ?1 AND next_review_at <= ?2
         ORDER BY next_review_at ASC
         LIMIT 20",
    )?;

    let items = stmt
        .query_map(params![learner_id, now], |row| {
            Ok((row.get::<_, i64>("id")?, item_from_row(row)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(items)
}

pub fn load_weak_areas(learner_id: i64, conn: &Connection) -> Result<Vec<WeakArea>> {
    let mut stmt = conn.prepare(
        "SELECT subject, topic, accuracy, attempts FROM weak_areas
         WHERE learner_id = ?1 ORDER BY subject, topic",
    )?;

    let areas = stmt
        .query_map(params![learner_id], |row| {
            Ok(WeakArea {
                subject: row.get(0)?,
                topic: row.get(1)?,
                accuracy: row.get(2)?,
                attempts: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<WeakArea>>>()?;

    Ok(areas)
}

pub fn store_weak_areas(learner_id: i64, areas: &[WeakArea], conn: &Connection) -> Result<()> {
    for area in areas {
        conn.execute(
            "INSERT OR REPLACE INTO weak_areas (learner_id, subject, topic, accuracy, attempts)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![learner_id, area.subject, area.topic, area.accuracy, area.attempts],
        )?;
    }
    Ok(())
}

/// Applies a review outcome to an item and to the learner's progress
///
/// Schedules the next review, folds a score below 3 into the learner's weak
/// areas, and awards review XP. The streak is deliberately untouched here;
/// only explicit activity events ([`record_activity`], [`record_test_result`])
/// move it.
pub fn apply_review(
    learner_id: i64,
    item_id: i64,
    score: u8,
    conn: &Connection,
) -> Result<MemorizedItem> {
    let now = get_current_date(conn)?;
    let item = load_item(learner_id, item_id, conn)?;
    let updated = scheduler::schedule(&item, score, now)?;
    store_item(item_id, &updated, conn)?;

    if score < 3 {
        let mut areas = load_weak_areas(learner_id, conn)?;
        weak_area::record_outcome(&mut areas, &updated.subject, &updated.topic, score);
        store_weak_areas(learner_id, &areas, conn)?;
    }

    let progress = gamification::add_xp(&load_progress(learner_id, conn)?, gamification::XP_REVIEW);
    store_progress(learner_id, &progress, conn)?;

    log::debug!(
        "item {item_id} reviewed with score {score}, next review in {} days",
        updated.interval_days
    );
    Ok(updated)
}

/// Stores a completed test and credits the learner for the activity
///
/// Awards test XP and updates the streak, then returns the record id.
pub fn record_test_result(learner_id: i64, record: &TestRecord, conn: &Connection) -> Result<i64> {
    conn.execute(
        "INSERT INTO test_records
            (learner_id, subject, topic, kind, difficulty,
             questions_count, correct_answers, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            learner_id,
            record.subject,
            record.topic,
            record.kind,
            record.difficulty,
            record.questions_count,
            record.correct_answers,
            to_timestamp(record.created_at)
        ],
    )?;
    let record_id = conn.last_insert_rowid();

    let now = get_current_date(conn)?;
    let progress = gamification::record_streak(&load_progress(learner_id, conn)?, now);
    let progress = gamification::add_xp(&progress, gamification::XP_TEST);
    store_progress(learner_id, &progress, conn)?;

    Ok(record_id)
}

pub fn load_test_records(learner_id: i64, conn: &Connection) -> Result<Vec<TestRecord>> {
    let mut stmt = conn.prepare(
        "SELECT subject, topic, kind, difficulty, questions_count, correct_answers, created_at
         FROM test_records WHERE learner_id = ?1 ORDER BY created_at ASC",
    )?;

    let records = stmt
        .query_map(params![learner_id], |row| {
            Ok(TestRecord {
                subject: row.get(0)?,
                topic: row.get(1)?,
                kind: row.get(2)?,
                difficulty: row.get(3)?,
                questions_count: row.get(4)?,
                correct_answers: row.get(5)?,
                created_at: from_timestamp(row.get(6)?),
            })
        })?
        .collect::<rusqlite::Result<Vec<TestRecord>>>()?;

    Ok(records)
}

/// Everything a progress view needs for one learner
#[derive(Clone, Debug, serde::Serialize)]
pub struct ProgressReport {
    pub xp: u32,
    pub level: u32,
    pub streak: u32,
    pub weak_areas: Vec<WeakArea>,
    pub subject_accuracy: Vec<SubjectAccuracy>,
    pub performance: Vec<PerformancePoint>,
}

/// Assembles the full progress summary for a learner
pub fn progress_report(learner_id: i64, conn: &Connection) -> Result<ProgressReport> {
    let progress = load_progress(learner_id, conn)?;
    let records = load_test_records(learner_id, conn)?;

    Ok(ProgressReport {
        xp: progress.xp,
        level: progress.level,
        streak: progress.streak,
        weak_areas: load_weak_areas(learner_id, conn)?,
        subject_accuracy: aggregator::accuracy_by_subject(&records),
        performance: aggregator::performance_series(&records).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_learner_round_trip() {
        let conn = test_conn();
        let id = add_learner("alice", &conn).unwrap();

        let progress = load_progress(id, &conn).unwrap();
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.level, 1);
        assert_eq!(progress.streak, 0);

        assert_eq!(get_all_learners(&conn).unwrap(), vec![(id, "alice".to_string())]);
    }

    #[test]
    fn test_new_item_is_due_immediately() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let item_id = add_item(learner, "Math", "Algebra", "2+2?", "4", &conn).unwrap();

        let due = due_items(learner, &conn).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, item_id);
        assert_eq!(due[0].1.question, "2+2?");
    }

    #[test]
    fn test_duplicate_question_is_ignored() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let first = add_item(learner, "Math", "Algebra", "2+2?", "4", &conn).unwrap();
        let second = add_item(learner, "Math", "Algebra", "2+2?", "four", &conn).unwrap();

        assert_eq!(first, second);
        assert_eq!(due_items(learner, &conn).unwrap().len(), 1);
    }

    #[test]
    fn test_successful_review_pushes_item_out_and_awards_xp() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let item_id = add_item(learner, "Math", "Algebra", "2+2?", "4", &conn).unwrap();

        let updated = apply_review(learner, item_id, 5, &conn).unwrap();
        assert_eq!(updated.times_reviewed, 1);
        assert_eq!(updated.interval_days, 1);

        // Not due anymore until the clock advances past the interval
        assert!(due_items(learner, &conn).unwrap().is_empty());
        advance_day(&conn).unwrap();
        assert_eq!(due_items(learner, &conn).unwrap().len(), 1);

        let progress = load_progress(learner, &conn).unwrap();
        assert_eq!(progress.xp, gamification::XP_REVIEW);
        // No weak area for a successful review
        assert!(load_weak_areas(learner, &conn).unwrap().is_empty());
    }

    #[test]
    fn test_failed_review_records_weak_area() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let item_id = add_item(learner, "Math", "Algebra", "2+2?", "4", &conn).unwrap();

        apply_review(learner, item_id, 1, &conn).unwrap();
        apply_review(learner, item_id, 0, &conn).unwrap();

        let areas = load_weak_areas(learner, &conn).unwrap();
        assert_eq!(areas.len(), 1);
        assert_eq!(areas[0].subject, "Math");
        assert_eq!(areas[0].topic, "Algebra");
        assert_eq!(areas[0].attempts, 2);
        assert_eq!(areas[0].accuracy, 0.0);
    }

    #[test]
    fn test_invalid_score_leaves_item_untouched() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let item_id = add_item(learner, "Math", "Algebra", "2+2?", "4", &conn).unwrap();

        let result = apply_review(learner, item_id, 9, &conn);
        assert!(matches!(
            result,
            Err(StorageError::Validation(ValidationError::ScoreOutOfRange(9)))
        ));

        let item = load_item(learner, item_id, &conn).unwrap();
        assert_eq!(item.times_reviewed, 0);
    }

    #[test]
    fn test_streak_follows_the_simulated_clock() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();

        // Same day: no streak movement
        let progress = record_activity(learner, &conn).unwrap();
        assert_eq!(progress.streak, 0);

        advance_day(&conn).unwrap();
        let progress = record_activity(learner, &conn).unwrap();
        assert_eq!(progress.streak, 1);

        advance_day(&conn).unwrap();
        let progress = record_activity(learner, &conn).unwrap();
        assert_eq!(progress.streak, 2);

        // Skipping days restarts the count
        advance_day(&conn).unwrap();
        advance_day(&conn).unwrap();
        advance_day(&conn).unwrap();
        let progress = record_activity(learner, &conn).unwrap();
        assert_eq!(progress.streak, 1);
    }

    #[test]
    fn test_progress_report_aggregates_history() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let now = get_current_date(&conn).unwrap();

        let math = TestRecord::new(
            "Math",
            "Algebra",
            TestKind::MultipleChoice,
            Difficulty::Medium,
            10,
            4,
            now,
        )
        .unwrap();
        let history = TestRecord::new(
            "History",
            "WW2",
            TestKind::ShortAnswer,
            Difficulty::Easy,
            10,
            9,
            now + Duration::hours(1),
        )
        .unwrap();

        record_test_result(learner, &math, &conn).unwrap();
        record_test_result(learner, &history, &conn).unwrap();

        let report = progress_report(learner, &conn).unwrap();
        assert_eq!(report.xp, 2 * gamification::XP_TEST);
        assert_eq!(report.subject_accuracy.len(), 2);
        // Weakest first
        assert_eq!(report.subject_accuracy[0].subject, "Math");
        assert_eq!(report.performance.len(), 2);
        assert_eq!(report.performance[0].label, "Algebra");
        assert_eq!(report.performance[0].value, 40.0);
        assert_eq!(report.performance[1].index, 2);
    }

    #[test]
    fn test_test_kind_survives_storage() {
        let conn = test_conn();
        let learner = add_learner("alice", &conn).unwrap();
        let now = get_current_date(&conn).unwrap();

        let record = TestRecord::new(
            "CS",
            "Sorting",
            TestKind::CodingProblem,
            Difficulty::Hard,
            3,
            2,
            now,
        )
        .unwrap();
        record_test_result(learner, &record, &conn).unwrap();

        let loaded = load_test_records(learner, &conn).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].kind, TestKind::CodingProblem);
        assert_eq!(loaded[0].difficulty, Difficulty::Hard);
    }
}
