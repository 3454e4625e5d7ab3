//! peakscope-trace: step traces of the pivot search over rotated sequences.
//!
//! Given a rotation of a strictly ascending sequence, [`generate`] runs an
//! adapted binary search for the maximum element ("peak") and returns a
//! [`Trace`]: every probe with its bounds, midpoint, branch and a narrative
//! action, ending in exactly one step that identifies the peak.
//!
//! ```
//! use peakscope_trace::{generate, StepKind};
//!
//! let trace = generate(&[4, 5, 6, 7, 0, 1, 2, 3]);
//! assert_eq!(trace.peak_index(), Some(3));
//! assert_eq!(trace.last().map(|s| s.kind), Some(StepKind::PivotRight));
//! ```
//!
//! The crate is pure: no I/O, no logging, no shared state.

pub mod error;
pub mod generator;
pub mod types;

pub use error::TraceError;
pub use generator::generate;
pub use types::{SENTINEL, Step, StepKind, Trace};
