//! Input sequences: parsing user text and generating random rotations.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

use crate::error::InputError;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("static regex is valid"));

/// Parse a comma-separated list of integers.
///
/// Tokens are trimmed and empty tokens are skipped, so `"1, 2,,3,"` parses to
/// `[1, 2, 3]`. The result is never empty.
pub fn parse_sequence(text: &str) -> Result<Vec<i64>, InputError> {
    let mut values = Vec::new();

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !INTEGER.is_match(token) {
            return Err(InputError::InvalidToken {
                token: token.to_string(),
            });
        }
        let value = token.parse::<i64>().map_err(|_| InputError::OutOfRange {
            token: token.to_string(),
        })?;
        values.push(value);
    }

    if values.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(values)
}

/// Format a sequence the way [`parse_sequence`] reads it.
pub fn format_sequence(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// `0..size` rotated at a random point.
///
/// The split point is drawn uniformly from `0..size`; everything after it is
/// moved to the front. Drawing the last index leaves the sequence unrotated.
/// `size` is clamped to at least 1.
pub fn random_rotation<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Vec<i64> {
    let n = size.max(1);
    let pivot = rng.random_range(0..n);
    rotate_at(n, pivot)
}

fn rotate_at(n: usize, pivot: usize) -> Vec<i64> {
    let base: Vec<i64> = (0..n as i64).collect();
    let mut rotated = base[pivot + 1..].to_vec();
    rotated.extend_from_slice(&base[..=pivot]);
    rotated
}
