//! Trace invariants checked over every rotation of a range of inputs.

use peakscope_trace::{SENTINEL, StepKind, Trace, generate};

/// All rotations of `base`, where rotation `k` starts at `base[k]`.
fn rotations(base: &[i64]) -> Vec<Vec<i64>> {
    (0..base.len())
        .map(|k| base[k..].iter().chain(&base[..k]).copied().collect())
        .collect()
}

fn ascending(len: usize, start: i64, stride: i64) -> Vec<i64> {
    (0..len as i64).map(|i| start + i * stride).collect()
}

fn expected_peak(values: &[i64]) -> usize {
    let max = values.iter().max().copied().unwrap();
    values.iter().position(|&v| v == max).unwrap()
}

fn assert_invariants(values: &[i64], trace: &Trace) {
    assert!(!trace.is_empty(), "empty trace for {values:?}");

    let found: Vec<_> = trace.iter().filter(|s| s.found).collect();
    assert_eq!(found.len(), 1, "expected one found step for {values:?}");
    assert!(trace.last().unwrap().found, "found step not last for {values:?}");

    for step in trace {
        assert_eq!(step.found, step.peak_index.is_some());
        assert_eq!(&*step.snapshot, values);
        if step.kind == StepKind::Fallback {
            assert_eq!((step.low, step.high, step.mid), (SENTINEL, SENTINEL, SENTINEL));
        } else {
            assert!(step.low <= step.mid && step.mid <= step.high);
            assert!(step.high < values.len() as i64);
        }
    }

    let peak = trace.peak_index().unwrap();
    assert!(peak < values.len());
}

#[test]
fn every_rotation_finds_the_maximum() {
    for len in 1..=16 {
        for (start, stride) in [(0, 1), (-20, 3), (-7, 1), (100, 11)] {
            let base = ascending(len, start, stride);
            for values in rotations(&base) {
                let trace = generate(&values);
                assert_invariants(&values, &trace);
                assert_eq!(
                    trace.peak_index(),
                    Some(expected_peak(&values)),
                    "wrong peak for {values:?}"
                );
            }
        }
    }
}

#[test]
fn only_unrotated_inputs_use_the_fallback() {
    for len in 2..=12 {
        let base = ascending(len, 0, 1);
        for (k, values) in rotations(&base).into_iter().enumerate() {
            let trace = generate(&values);
            assert_eq!(trace.used_fallback(), k == 0, "rotation {k} of length {len}");
        }
    }
}

#[test]
fn binary_search_is_logarithmic() {
    for len in [2usize, 10, 100, 1000] {
        let base = ascending(len, 0, 1);
        let bound = (usize::BITS - len.leading_zeros()) as usize + 1;
        for values in rotations(&base) {
            let probes = generate(&values)
                .iter()
                .filter(|s| !s.is_fallback())
                .count();
            assert!(probes <= bound, "{probes} probes for length {len}");
        }
    }
}

#[test]
fn generation_is_deterministic() {
    let input = [15, 18, 22, 3, 7, 9, 11];
    assert_eq!(generate(&input), generate(&input));
}

#[test]
fn singleton_law() {
    for x in [-5, 0, 42] {
        let trace = generate(&[x]);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.peak_index(), Some(0));
        assert_eq!(trace.peak_value(), Some(x));
    }
}

#[test]
fn checks_run_in_fixed_order() {
    // Out-of-contract input: at mid = 1 both pivot checks hold, the
    // right-hand one is evaluated first.
    let trace = generate(&[5, 3, 1]);
    assert_eq!(trace[0].kind, StepKind::PivotRight);
    assert_eq!(trace.peak_index(), Some(1));
}

#[test]
fn trace_serializes_as_step_array() {
    let trace = generate(&[3, 1, 2]);
    let json = serde_json::to_value(&trace).unwrap();
    let steps = json.as_array().unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0]["kind"], "pivot_left");
    assert_eq!(steps[0]["found"], true);

    let back: Trace = serde_json::from_value(json).unwrap();
    assert_eq!(back, trace);
}
