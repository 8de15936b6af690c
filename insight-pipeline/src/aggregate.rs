//! Shared group-and-reduce helpers.
//!
//! The rules, applied everywhere:
//! - missing or non-numeric values coerce to 0 before aggregation, so a NaN
//!   never propagates into a sum;
//! - percentage-type aggregates use mean, not sum, across a group;
//! - ratios guard the zero-denominator case and yield 0.

use std::collections::HashMap;

/// Coerce a possibly-NaN/inf value to something summable.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is zero or invalid.
/// Zero sessions, zero gross sales and zero orders are everyday states for
/// a filtered slice, not errors.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 && denominator.is_finite() {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// `numerator / denominator * 100`, with the same zero-denominator fallback.
pub fn safe_pct(numerator: f64, denominator: f64) -> f64 {
    safe_ratio(numerator, denominator) * 100.0
}

/// Group rows by a string key and sum a numeric column.
/// Returns (key, sum) pairs sorted by key for deterministic output.
pub fn sum_by<T>(
    rows: &[T],
    key: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> f64,
) -> Vec<(String, f64)> {
    let mut groups: HashMap<String, f64> = HashMap::new();
    for row in rows {
        *groups.entry(key(row).to_string()).or_default() += finite_or_zero(value(row));
    }
    let mut result: Vec<_> = groups.into_iter().collect();
    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// Group rows by a string key and average a numeric column.
pub fn mean_by<T>(
    rows: &[T],
    key: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> f64,
) -> Vec<(String, f64)> {
    let mut groups: HashMap<String, (f64, usize)> = HashMap::new();
    for row in rows {
        let entry = groups.entry(key(row).to_string()).or_default();
        entry.0 += finite_or_zero(value(row));
        entry.1 += 1;
    }
    let mut result: Vec<_> = groups
        .into_iter()
        .map(|(k, (sum, n))| (k, safe_ratio(sum, n as f64)))
        .collect();
    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// Mean over a plain slice of values, 0 for an empty slice.
pub fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += finite_or_zero(v);
        n += 1;
    }
    safe_ratio(sum, n as f64)
}

/// Median over a plain slice of values, 0 for an empty one. Even-sized
/// inputs interpolate the middle pair.
pub fn median(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.into_iter().map(finite_or_zero).collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// The (key, sum) pair with the largest sum, if any.
pub fn top_by_sum<T>(
    rows: &[T],
    key: impl Fn(&T) -> &str,
    value: impl Fn(&T) -> f64,
) -> Option<(String, f64)> {
    sum_by(rows, key, value)
        .into_iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
}

/// The most frequent key, with its count. Ties break toward the
/// lexicographically smaller key.
pub fn top_by_count<T>(rows: &[T], key: impl Fn(&T) -> &str) -> Option<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in rows {
        *counts.entry(key(row).to_string()).or_default() += 1;
    }
    let mut pairs: Vec<_> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.into_iter().next()
}

/// Count of distinct keys.
pub fn distinct_count<T>(rows: &[T], key: impl Fn(&T) -> &str) -> usize {
    let mut keys: Vec<&str> = rows.iter().map(|r| key(r)).collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}
