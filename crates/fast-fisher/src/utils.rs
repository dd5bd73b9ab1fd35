//! Utility functions for fast-fisher.
//!
//! # Floating-Point Comparison
//!
//! p-values are sums of many exponentiated terms, so exact equality is rarely
//! meaningful. This module provides tolerance-based comparisons for testing
//! and validation, and the probability clamp applied to every p-value.
//!
//! # Example
//!
//! ```
//! use fast_fisher::utils::{approx_eq, LOOSE_EPSILON};
//!
//! let p = 77.0 / 84.0;
//! assert!(approx_eq(p, 0.916_666_7, LOOSE_EPSILON));
//! ```

/// Standard epsilon for high-precision floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Looser epsilon, the absolute tolerance used when cross-validating p-values
/// against reference implementations.
pub const LOOSE_EPSILON: f64 = 1e-6;

/// Approximate equality check for floating-point values.
///
/// Returns `true` if `a` and `b` are within `tolerance` of each other,
/// or if both are NaN. Two infinities of the same sign compare equal.
///
/// # Example
///
/// ```
/// use fast_fisher::utils::{approx_eq, EPSILON};
///
/// assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
/// assert!(!approx_eq(1.0, 2.0, EPSILON));
/// assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
/// assert!(approx_eq(f64::INFINITY, f64::INFINITY, EPSILON));
/// ```
#[inline]
#[must_use]
#[allow(clippy::float_cmp)]
pub fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }
    if a.is_infinite() || b.is_infinite() {
        return a == b;
    }
    (a - b).abs() < tolerance
}

/// Relative approximate equality check for floating-point values.
///
/// More appropriate than [`approx_eq`] for tiny p-values such as `1e-30`.
///
/// # Example
///
/// ```
/// use fast_fisher::utils::approx_eq_relative;
///
/// assert!(approx_eq_relative(7.686_224_774_594_537e-29, 7.686_224_77e-29, 1e-8));
/// ```
#[inline]
#[must_use]
pub fn approx_eq_relative(a: f64, b: f64, rel_tolerance: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    if a.is_nan() || b.is_nan() {
        return false;
    }

    let diff = (a - b).abs();
    let max_abs = a.abs().max(b.abs());

    if max_abs == 0.0 {
        return diff == 0.0;
    }

    diff / max_abs < rel_tolerance
}

/// Clamps a computed probability into `[0.0, 1.0]`.
///
/// Absorbs the residual drift of floating-point summation, such as
/// `1.000_000_000_000_000_2` or `-1e-17`. NaN is mapped to `1.0`.
///
/// # Example
///
/// ```
/// use fast_fisher::utils::clamp_probability;
///
/// assert_eq!(clamp_probability(1.0 + 1e-15), 1.0);
/// assert_eq!(clamp_probability(-1e-17), 0.0);
/// assert_eq!(clamp_probability(0.25), 0.25);
/// ```
#[inline]
#[must_use]
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        1.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_basic() {
        assert!(approx_eq(1.0, 1.0, EPSILON));
        assert!(approx_eq(1.0, 1.0 + 1e-11, EPSILON));
        assert!(!approx_eq(1.0, 2.0, EPSILON));
    }

    #[test]
    fn test_approx_eq_nan() {
        assert!(approx_eq(f64::NAN, f64::NAN, EPSILON));
        assert!(!approx_eq(f64::NAN, 1.0, EPSILON));
        assert!(!approx_eq(1.0, f64::NAN, EPSILON));
    }

    #[test]
    fn test_approx_eq_infinity() {
        assert!(approx_eq(f64::INFINITY, f64::INFINITY, EPSILON));
        assert!(!approx_eq(f64::INFINITY, f64::NEG_INFINITY, EPSILON));
        assert!(!approx_eq(f64::INFINITY, 1e300, EPSILON));
    }

    #[test]
    fn test_approx_eq_relative_basic() {
        assert!(approx_eq_relative(1.0, 1.0, 1e-10));
        assert!(approx_eq_relative(1e10, 1e10 + 1.0, 1e-9));
        assert!(!approx_eq_relative(1.0, 2.0, 1e-10));
    }

    #[test]
    fn test_approx_eq_relative_zero() {
        assert!(approx_eq_relative(0.0, 0.0, 1e-10));
        assert!(!approx_eq_relative(0.0, 1e-11, 1e-10));
    }

    #[test]
    fn test_clamp_probability() {
        assert_eq!(clamp_probability(0.5), 0.5);
        assert_eq!(clamp_probability(1.5), 1.0);
        assert_eq!(clamp_probability(-0.5), 0.0);
        assert_eq!(clamp_probability(f64::NAN), 1.0);
    }
}
