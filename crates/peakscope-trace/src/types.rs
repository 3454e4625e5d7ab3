//! Step and trace data types.
//!
//! A [`Trace`] is the ordered record of every decision the pivot search made
//! for one input. Traces are built by [`crate::generate`] and are read-only
//! afterwards.

use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::TraceError;

/// Index value used for `low`, `high` and `mid` on the fallback step.
pub const SENTINEL: i64 = -1;

/// Which branch of the search produced a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// One-element input; the only element is the peak.
    Singleton,
    /// `arr[mid] > arr[mid+1]`: `mid` is the peak.
    PivotRight,
    /// `arr[mid] < arr[mid-1]`: `mid - 1` is the peak.
    PivotLeft,
    /// `arr[low] <= arr[mid]`: left half sorted, `low` moves to `mid + 1`.
    MoveLow,
    /// `arr[low] > arr[mid]`: pivot in left half, `high` moves to `mid - 1`.
    MoveHigh,
    /// Synthetic final step from the linear max scan.
    Fallback,
}

impl StepKind {
    /// Whether steps of this kind identify the peak.
    pub fn is_terminal(self) -> bool {
        !matches!(self, StepKind::MoveLow | StepKind::MoveHigh)
    }
}

/// One decision point of the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Lower search bound, or [`SENTINEL`] on the fallback step.
    pub low: i64,

    /// Upper search bound, or [`SENTINEL`] on the fallback step.
    pub high: i64,

    /// Probed midpoint, or [`SENTINEL`] on the fallback step.
    pub mid: i64,

    /// The input as it was when the step was recorded.
    pub snapshot: Arc<[i64]>,

    /// Branch taken at this step.
    pub kind: StepKind,

    /// Human-readable description of the branch and the values compared.
    pub action: String,

    /// True exactly on the step that identifies the peak.
    pub found: bool,

    /// Index of the maximum element; present iff `found`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peak_index: Option<usize>,
}

impl Step {
    pub(crate) fn probe(
        snapshot: &Arc<[i64]>,
        low: usize,
        high: usize,
        mid: usize,
        kind: StepKind,
        action: String,
    ) -> Self {
        Self {
            low: low as i64,
            high: high as i64,
            mid: mid as i64,
            snapshot: Arc::clone(snapshot),
            kind,
            action,
            found: false,
            peak_index: None,
        }
    }

    pub(crate) fn fallback(snapshot: &Arc<[i64]>, peak_index: usize, action: String) -> Self {
        Self {
            low: SENTINEL,
            high: SENTINEL,
            mid: SENTINEL,
            snapshot: Arc::clone(snapshot),
            kind: StepKind::Fallback,
            action,
            found: true,
            peak_index: Some(peak_index),
        }
    }

    pub(crate) fn with_peak(mut self, peak_index: usize) -> Self {
        self.found = true;
        self.peak_index = Some(peak_index);
        self
    }

    /// True for the synthetic fallback step.
    pub fn is_fallback(&self) -> bool {
        self.kind == StepKind::Fallback
    }

    /// Value at `index` in the snapshot, if `index` is a real position.
    ///
    /// Returns `None` for [`SENTINEL`] and out-of-range indices.
    pub fn value_at(&self, index: i64) -> Option<i64> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.snapshot.get(i).copied())
    }

    /// Value of the peak element, when this step found it.
    pub fn peak_value(&self) -> Option<i64> {
        self.peak_index.and_then(|i| self.snapshot.get(i).copied())
    }
}

/// Chronological sequence of [`Step`]s for one input.
///
/// Serializes as a plain array of steps. Deserializing goes through
/// `TryFrom<Vec<Step>>`, so a trace read back from JSON holds the same
/// invariants as one built by [`crate::generate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Step>")]
pub struct Trace {
    steps: Vec<Step>,
}

impl Serialize for Trace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.steps.serialize(serializer)
    }
}

impl TryFrom<Vec<Step>> for Trace {
    type Error = TraceError;

    /// Accepts an empty list, or steps where only the last one is found and
    /// every found step points inside its snapshot.
    fn try_from(steps: Vec<Step>) -> Result<Self, Self::Error> {
        let last = steps.len().saturating_sub(1);
        for (index, step) in steps.iter().enumerate() {
            if step.found != step.peak_index.is_some() {
                return Err(TraceError::PeakMismatch { index });
            }
            if step.found && index != last {
                return Err(TraceError::FoundBeforeEnd { index });
            }
            if let Some(peak) = step.peak_index.filter(|&p| p >= step.snapshot.len()) {
                return Err(TraceError::PeakOutOfRange { index, peak });
            }
        }
        if steps.last().is_some_and(|s| !s.found) {
            return Err(TraceError::NotFound);
        }
        Ok(Self { steps })
    }
}

impl Trace {
    pub(crate) fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// All steps in decision order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// The step that identified the peak.
    pub fn found_step(&self) -> Option<&Step> {
        self.steps.last().filter(|s| s.found)
    }

    /// Index of the peak element.
    pub fn peak_index(&self) -> Option<usize> {
        self.found_step().and_then(|s| s.peak_index)
    }

    /// Value of the peak element.
    pub fn peak_value(&self) -> Option<i64> {
        self.found_step().and_then(Step::peak_value)
    }

    /// The input sequence this trace was generated from.
    pub fn input(&self) -> Option<&[i64]> {
        self.steps.first().map(|s| &*s.snapshot)
    }

    /// Whether the peak was only detected by the fallback scan.
    pub fn used_fallback(&self) -> bool {
        self.found_step().is_some_and(Step::is_fallback)
    }
}

impl Index<usize> for Trace {
    type Output = Step;

    fn index(&self, index: usize) -> &Step {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
