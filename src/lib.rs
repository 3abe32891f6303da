pub mod database;
pub mod export;
pub mod models;

pub use models::{LearnerProgress, MemorizedItem, TestRecord, ValidationError, WeakArea};
