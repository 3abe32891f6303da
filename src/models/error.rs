//! Error types raised by the progress-tracking core.
use thiserror::Error;

/// Invalid input rejected by a core operation.
///
/// Lookup misses are not errors anywhere in the core: a missing weak area
/// means "create one" (see [`crate::models::weak_area::record_outcome`]).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Recall scores live on the 0-5 scale; anything else is rejected
    /// outright rather than clamped.
    #[error("recall score {0} is outside the accepted range 0-5")]
    ScoreOutOfRange(u8),

    /// A test record cannot have more correct answers than questions.
    #[error("test record claims {correct} correct answers out of {total} questions")]
    MalformedRecord { correct: u32, total: u32 },
}
