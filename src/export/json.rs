//! JSON import/export of a learner's study data.
//! Lets a learner move their items, history, and progress between machines.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};

use crate::models::{LearnerProgress, MemorizedItem, TestRecord, WeakArea};

/// Everything owned by one learner, in a portable shape.
#[derive(Clone, Serialize, Deserialize)]
pub struct StudySnapshot {
    pub learner: String,
    pub progress: LearnerProgress,
    pub items: Vec<MemorizedItem>,
    pub weak_areas: Vec<WeakArea>,
    pub test_records: Vec<TestRecord>,
}

/// Exports a snapshot to a JSON file at the specified path.
/// Returns an error if file creation or writing fails.
pub fn export_json_to_path(
    snapshot: &StudySnapshot,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let json_string = serde_json::to_string_pretty(snapshot)?;
    let mut file = File::create(path)?;
    file.write_all(json_string.as_bytes())?;
    Ok(())
}

/// Imports a snapshot from a JSON file.
/// Returns an error if the file doesn't exist or contains invalid JSON.
pub fn import_json(filename: &str) -> Result<StudySnapshot, Box<dyn std::error::Error>> {
    let mut file = File::open(filename)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let snapshot: StudySnapshot = serde_json::from_str(&contents)?;

    log::info!(
        "snapshot for '{}' imported from '{}' ({} items)",
        snapshot.learner,
        filename,
        snapshot.items.len()
    );
    Ok(snapshot)
}
