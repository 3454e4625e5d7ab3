//! The pivot search and its trace.
//!
//! The search is a binary search adapted to find the maximum of a rotated
//! ascending sequence. At every probe it checks, in this order:
//!
//! 1. `arr[mid] > arr[mid+1]` (the descent is right after `mid`)
//! 2. `arr[mid] < arr[mid-1]` (the descent is right before `mid`)
//! 3. which half still contains the rotation boundary
//!
//! An unrotated sequence never triggers the first two checks, so the loop can
//! exhaust its bounds without a result; a linear max scan then closes the
//! trace with a fallback step.

use std::sync::Arc;

use crate::types::{Step, StepKind, Trace};

/// Replay the pivot search over `sequence` and record every decision.
///
/// The returned trace is non-empty for any non-empty input and its last step
/// is the only one with `found == true`. An empty input yields an empty trace.
pub fn generate(sequence: &[i64]) -> Trace {
    let mut trace = Trace::default();
    if sequence.is_empty() {
        return trace;
    }

    let snapshot: Arc<[i64]> = Arc::from(sequence);
    let a = &*snapshot;

    if a.len() == 1 {
        let step = Step::probe(
            &snapshot,
            0,
            0,
            0,
            StepKind::Singleton,
            "Single element: peak at index 0".to_string(),
        )
        .with_peak(0);
        trace.push(step);
        return trace;
    }

    let mut low = 0usize;
    let mut high = a.len() - 1;

    while low <= high {
        let mid = low + (high - low) / 2;

        if mid < high && a[mid] > a[mid + 1] {
            let action = format!(
                "arr[mid] is greater than arr[mid+1]: peak at index {mid} ({} vs {})",
                a[mid],
                a[mid + 1]
            );
            let step = Step::probe(&snapshot, low, high, mid, StepKind::PivotRight, action);
            trace.push(step.with_peak(mid));
            break;
        }

        if mid > low && a[mid] < a[mid - 1] {
            let action = format!(
                "arr[mid] is less than arr[mid-1]: peak at index {} ({} vs {})",
                mid - 1,
                a[mid - 1],
                a[mid]
            );
            let step = Step::probe(&snapshot, low, high, mid, StepKind::PivotLeft, action);
            trace.push(step.with_peak(mid - 1));
            break;
        }

        if a[low] <= a[mid] {
            let action = format!(
                "Left half is sorted (arr[low] not larger than arr[mid], {} compared with {}). Move low to mid + 1",
                a[low], a[mid]
            );
            trace.push(Step::probe(&snapshot, low, high, mid, StepKind::MoveLow, action));
            low = mid + 1;
        } else {
            let action = format!(
                "Pivot lies in left half (arr[low] larger than arr[mid], {} compared with {}). Move high to mid - 1",
                a[low], a[mid]
            );
            trace.push(Step::probe(&snapshot, low, high, mid, StepKind::MoveHigh, action));
            // a[low] > a[mid] implies mid > low, so this cannot underflow.
            high = mid - 1;
        }
    }

    if trace.found_step().is_none() {
        let peak = max_index(a);
        let action = format!(
            "No rotation detected by loop; fallback peak at index {peak} (value {})",
            a[peak]
        );
        trace.push(Step::fallback(&snapshot, peak, action));
    }

    trace
}

/// Index of the first occurrence of the maximum value.
fn max_index(a: &[i64]) -> usize {
    let mut best = 0;
    for (i, &v) in a.iter().enumerate().skip(1) {
        if v > a[best] {
            best = i;
        }
    }
    best
}
