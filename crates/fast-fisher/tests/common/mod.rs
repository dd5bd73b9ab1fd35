//! Shared test utilities for fast-fisher tests.
//!
//! The reference summation here deliberately avoids every crate kernel: it
//! evaluates `ln C(m, j)` with statrs and sums the whole support.

use statrs::function::factorial::ln_binomial;

use fast_fisher::Alternative;

/// Approximate equality check for floating-point values.
///
/// Two NaN values are considered equal for testing purposes.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    (a - b).abs() < eps
}

/// Standard epsilon for high-precision comparisons.
#[allow(dead_code)]
pub const EPSILON: f64 = 1e-10;

/// Absolute tolerance for cross-validation against reference implementations.
#[allow(dead_code)]
pub const LOOSE_EPSILON: f64 = 1e-6;

/// The inputs of the two-table example batch.
#[allow(dead_code)]
pub const SCENARIO: ([u64; 2], [u64; 2], [u64; 2], [u64; 2]) = ([1, 3], [2, 5], [1, 4], [5, 50]);

/// `ln P(X = k)` for the top-left cell of a table with the given margins.
#[allow(dead_code)]
pub fn reference_ln_pmf(k: u64, row1: u64, col1: u64, n: u64) -> f64 {
    let col2 = n - col1;
    if k > col1 || k > row1 || row1 - k > col2 {
        return f64::NEG_INFINITY;
    }
    ln_binomial(col1, k) + ln_binomial(col2, row1 - k) - ln_binomial(n, row1)
}

/// Plain full-support Fisher exact p-value for `[a, b, c, d]`.
#[allow(dead_code)]
pub fn reference_p_value(table: [u64; 4], alternative: Alternative, tolerance: f64) -> f64 {
    let [a, b, c, d] = table;
    let row1 = a + b;
    let col1 = a + c;
    let n = a + b + c + d;
    let col2 = n - col1;
    let lo = row1.saturating_sub(col2);
    let hi = row1.min(col1);
    if lo == hi {
        return 1.0;
    }

    let observed = reference_ln_pmf(a, row1, col1, n);
    let threshold = observed + tolerance.ln_1p();
    let terms: Vec<f64> = (lo..=hi)
        .filter(|&k| match alternative {
            Alternative::Less => k <= a,
            Alternative::Greater => k >= a,
            Alternative::TwoSided => reference_ln_pmf(k, row1, col1, n) <= threshold,
        })
        .map(|k| reference_ln_pmf(k, row1, col1, n))
        .collect();

    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return 0.0;
    }
    let sum: f64 = terms.iter().map(|t| (t - max).exp()).sum();
    (max + sum.ln()).exp().clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_small_table() {
        let p = reference_p_value([1, 2, 1, 5], Alternative::Less, 1e-7);
        assert!(approx_eq(p, 77.0 / 84.0, 1e-12));
    }

    #[test]
    fn test_reference_pmf_outside_support() {
        assert_eq!(reference_ln_pmf(5, 3, 4, 9), f64::NEG_INFINITY);
    }
}
