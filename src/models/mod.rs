pub mod aggregator;
pub mod error;
pub mod gamification;
pub mod learner_progress;
pub mod memorized_item;
pub mod scheduler;
pub mod test_record;
pub mod weak_area;

pub use aggregator::{PerformancePoint, SubjectAccuracy};
pub use error::ValidationError;
pub use learner_progress::LearnerProgress;
pub use memorized_item::MemorizedItem;
pub use test_record::{Difficulty, TestKind, TestRecord};
pub use weak_area::WeakArea;
