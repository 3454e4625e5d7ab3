//! Errors for traces that do not hold together.

use thiserror::Error;

/// Why a list of steps is not a valid [`crate::Trace`].
///
/// Only raised when a trace is rebuilt from outside data, e.g. deserialized
/// from JSON. [`crate::generate`] never produces an invalid trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("step {index}: found flag and peak index disagree")]
    PeakMismatch { index: usize },

    #[error("step {index}: peak found before the last step")]
    FoundBeforeEnd { index: usize },

    #[error("last step does not identify the peak")]
    NotFound,

    #[error("step {index}: peak index {peak} is outside the snapshot")]
    PeakOutOfRange { index: usize, peak: usize },
}
