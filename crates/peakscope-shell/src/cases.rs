//! Built-in example battery used to self-check the generator end to end.

use peakscope_trace::generate;
use serde::Serialize;

use crate::error::{Result, ShellError};

/// A named input with its known peak index.
#[derive(Debug, Clone, Copy)]
pub struct ExampleCase {
    pub name: &'static str,
    pub values: &'static [i64],
    pub expected_index: usize,
}

pub static EXAMPLE_CASES: [ExampleCase; 6] = [
    ExampleCase {
        name: "Example from prompt",
        values: &[8, 9, 0, 1, 2, 3, 4, 5, 6, 7],
        expected_index: 1,
    },
    ExampleCase {
        name: "Typical rotation",
        values: &[4, 5, 6, 7, 0, 1, 2, 3],
        expected_index: 3,
    },
    ExampleCase {
        name: "No rotation (ascending)",
        values: &[1, 2, 3, 4, 5, 6, 7],
        expected_index: 6,
    },
    ExampleCase {
        name: "Single element",
        values: &[2],
        expected_index: 0,
    },
    ExampleCase {
        name: "Peak at index 0",
        values: &[3, 1, 2],
        expected_index: 0,
    },
    ExampleCase {
        name: "Peak in middle",
        values: &[2, 3, 4, 5, 1],
        expected_index: 3,
    },
];

/// Outcome of running one example through the generator.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub values: Vec<i64>,
    pub expected_index: usize,
    pub got_index: Option<usize>,
    pub value: Option<i64>,
    pub steps: usize,
    pub passed: bool,
}

impl ExampleCase {
    pub fn run(&self) -> CaseReport {
        let trace = generate(self.values);
        let got_index = trace.peak_index();
        CaseReport {
            name: self.name.to_string(),
            values: self.values.to_vec(),
            expected_index: self.expected_index,
            got_index,
            value: trace.peak_value(),
            steps: trace.len(),
            passed: got_index == Some(self.expected_index),
        }
    }
}

/// Run the whole battery in order.
pub fn run_examples() -> Vec<CaseReport> {
    EXAMPLE_CASES.iter().map(ExampleCase::run).collect()
}

/// Look up an example by 1-based number or by case-insensitive name.
pub fn find_case(key: &str) -> Result<&'static ExampleCase> {
    let key = key.trim();
    let by_number = key
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| EXAMPLE_CASES.get(i));

    by_number
        .or_else(|| {
            EXAMPLE_CASES
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(key))
        })
        .ok_or_else(|| ShellError::UnknownCase(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_examples_pass() {
        let reports = run_examples();
        assert_eq!(reports.len(), EXAMPLE_CASES.len());
        for report in &reports {
            assert!(report.passed, "{} failed: {:?}", report.name, report.got_index);
        }
    }

    #[test]
    fn test_report_values() {
        let report = EXAMPLE_CASES[0].run();
        assert_eq!(report.got_index, Some(1));
        assert_eq!(report.value, Some(9));
        assert_eq!(report.steps, 2);
    }

    #[test]
    fn test_find_case() {
        assert_eq!(find_case("1").unwrap().expected_index, 1);
        assert_eq!(find_case("single element").unwrap().values, &[2]);
        assert!(matches!(find_case("0"), Err(ShellError::UnknownCase(_))));
        assert!(matches!(find_case("7"), Err(ShellError::UnknownCase(_))));
        assert!(find_case("nope").is_err());
    }
}
