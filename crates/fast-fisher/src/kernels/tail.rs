//! Tail summation over the hypergeometric support.
//!
//! Given the mass function of a table's top-left cell and its observed value
//! `a`, this module computes the p-value for each alternative:
//!
//! ```text
//! less       sum of P(k) for k in [lo, a]
//! greater    sum of P(k) for k in [a, hi]
//! two-sided  sum of P(k) for k in [lo, hi] with P(k) <= P(a) * (1 + tol)
//! ```
//!
//! # Algorithm
//!
//! The mass is unimodal, so every tail that does not contain the mode is a
//! run of terms that shrink monotonically as they move away from it. Tails
//! are therefore summed outward from the end nearest the mode and cut off as
//! soon as the terms still to come cannot move the sum by more than one
//! machine epsilon:
//!
//! ```text
//! remaining_count * current_term < EPSILON * running_sum
//! ```
//!
//! A one-sided tail that does contain the mode is computed as one minus the
//! opposite strict tail, which never contains it.
//!
//! For the two-sided test the qualifying set `{k : P(k) <= P(a) * (1 + tol)}`
//! is a prefix plus a suffix of the support. Both boundaries are found by
//! binary search on the monotone halves either side of the mode, then each
//! piece is summed outward as above. The cost is O(log(hi - lo)) mass
//! evaluations plus the tail terms that actually contribute.
//!
//! All sums are accumulated with [`LogSumExp`] and clamped to `[0, 1]`.

use crate::alternative::Alternative;
use crate::kernels::hypergeometric::HypergeometricPmf;
use crate::kernels::log_sum_exp::LogSumExp;
use crate::utils::clamp_probability;

/// Default relative tolerance of the two-sided equality boundary.
pub const DEFAULT_TWO_SIDED_TOLERANCE: f64 = 1e-7;

/// Returns the p-value of `observed` under `alternative`.
///
/// `observed` must lie in the support of `pmf`.
#[inline]
#[must_use]
pub fn tail_p_value(
    pmf: &HypergeometricPmf<'_>,
    observed: u64,
    alternative: Alternative,
    tolerance: f64,
) -> f64 {
    match alternative {
        Alternative::Less => less_tail(pmf, observed),
        Alternative::Greater => greater_tail(pmf, observed),
        Alternative::TwoSided => two_sided_tail(pmf, observed, tolerance),
    }
}

/// `P(X <= observed)`.
#[must_use]
pub fn less_tail(pmf: &HypergeometricPmf<'_>, observed: u64) -> f64 {
    let support = pmf.support();
    debug_assert!(support.contains(observed));
    if observed >= support.hi() {
        return 1.0;
    }

    let mut acc = LogSumExp::new();
    if observed <= support.mode() {
        sum_downward(pmf, observed, support.lo(), &mut acc);
        clamp_probability(acc.sum())
    } else {
        sum_upward(pmf, observed + 1, support.hi(), &mut acc);
        clamp_probability(1.0 - acc.sum())
    }
}

/// `P(X >= observed)`.
#[must_use]
pub fn greater_tail(pmf: &HypergeometricPmf<'_>, observed: u64) -> f64 {
    let support = pmf.support();
    debug_assert!(support.contains(observed));
    if observed <= support.lo() {
        return 1.0;
    }

    let mut acc = LogSumExp::new();
    if observed >= support.mode() {
        sum_upward(pmf, observed, support.hi(), &mut acc);
        clamp_probability(acc.sum())
    } else {
        sum_downward(pmf, observed - 1, support.lo(), &mut acc);
        clamp_probability(1.0 - acc.sum())
    }
}

/// Total mass of the tables no more likely than `observed`.
///
/// A table counts as "no more likely" when its mass is at most
/// `P(observed) * (1 + tolerance)`.
#[must_use]
pub fn two_sided_tail(pmf: &HypergeometricPmf<'_>, observed: u64, tolerance: f64) -> f64 {
    let support = pmf.support();
    debug_assert!(support.contains(observed));
    if support.is_degenerate() {
        return 1.0;
    }

    let threshold = pmf.ln_pmf(observed) + tolerance.ln_1p();
    let mode = support.mode();
    if pmf.ln_pmf(mode) <= threshold {
        return 1.0;
    }

    // [first, last] is the block around the mode more likely than the observation.
    let first = first_above(pmf, support.lo(), mode, threshold);
    let last = last_above(pmf, mode, support.hi(), threshold);

    let mut left = LogSumExp::new();
    if first > support.lo() {
        sum_downward(pmf, first - 1, support.lo(), &mut left);
    }
    let mut right = LogSumExp::new();
    if last < support.hi() {
        sum_upward(pmf, last + 1, support.hi(), &mut right);
    }
    left.merge(&right);
    clamp_probability(left.sum())
}

/// Smallest `k` in `[lo, hi]` with `ln_pmf(k) > threshold`.
///
/// The mass is non-decreasing on `[lo, hi]` and `hi` satisfies the predicate.
fn first_above(pmf: &HypergeometricPmf<'_>, lo: u64, hi: u64, threshold: f64) -> u64 {
    let (mut lo, mut hi) = (lo, hi);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pmf.ln_pmf(mid) > threshold {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Largest `k` in `[lo, hi]` with `ln_pmf(k) > threshold`.
///
/// The mass is non-increasing on `[lo, hi]` and `lo` satisfies the predicate.
fn last_above(pmf: &HypergeometricPmf<'_>, lo: u64, hi: u64, threshold: f64) -> u64 {
    let (mut lo, mut hi) = (lo, hi);
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if pmf.ln_pmf(mid) > threshold {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Adds `P(k)` for `k = start, start - 1, ..., stop`.
///
/// Terms must be non-increasing in that order.
fn sum_downward(pmf: &HypergeometricPmf<'_>, start: u64, stop: u64, acc: &mut LogSumExp) {
    let mut k = start;
    loop {
        let term = pmf.ln_pmf(k);
        acc.push(term);
        if k == stop || negligible(term, k - stop, acc) {
            break;
        }
        k -= 1;
    }
}

/// Adds `P(k)` for `k = start, start + 1, ..., stop`.
///
/// Terms must be non-increasing in that order.
fn sum_upward(pmf: &HypergeometricPmf<'_>, start: u64, stop: u64, acc: &mut LogSumExp) {
    let mut k = start;
    loop {
        let term = pmf.ln_pmf(k);
        acc.push(term);
        if k == stop || negligible(term, stop - k, acc) {
            break;
        }
        k += 1;
    }
}

/// `true` once `remaining` more terms, each at most `exp(term)`, cannot
/// change the running sum by more than one machine epsilon.
#[inline]
fn negligible(term: f64, remaining: u64, acc: &LogSumExp) -> bool {
    #[allow(clippy::cast_precision_loss)]
    let bound = term + (remaining as f64).ln();
    bound < acc.ln_sum() + f64::EPSILON.ln()
}
