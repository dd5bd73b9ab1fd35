//! Single-table Fisher exact test.
//!
//! The per-table pipeline is: margins, support, log-mass setup, tail sum.
//! Batch evaluation in [`crate::batch`] runs the same pipeline per index.
//!
//! # Boundary Rules
//!
//! - A table whose support is a single point (including the all-zero table,
//!   and any table with an all-zero row or column) has p-value `1.0` under
//!   every alternative.
//! - A table whose total overflows `u64` fails with `Error::InvalidMargins`.
//!
//! # Example
//!
//! ```
//! use fast_fisher::exact::{fishers_exact, fishers_exact_all};
//! use fast_fisher::Alternative;
//!
//! let p = fishers_exact(&[3_u64, 5, 4, 50], Alternative::Greater).unwrap();
//! assert!((p - 0.039_707_492_465_292_77).abs() < 1e-12);
//!
//! let all = fishers_exact_all(&[1_u64, 2, 1, 5]).unwrap();
//! assert!((all.less - 77.0 / 84.0).abs() < 1e-12);
//! assert_eq!(all.two_sided, 1.0);
//! ```

use crate::alternative::Alternative;
use crate::error::Result;
use crate::kernels::hypergeometric::HypergeometricPmf;
use crate::kernels::log_factorial::{LogFactorialCache, SharedLogFactorialCache};
use crate::kernels::tail::{
    greater_tail, less_tail, tail_p_value, two_sided_tail, DEFAULT_TWO_SIDED_TOLERANCE,
};
use crate::table::Table;
use crate::traits::{CountElement, IntoAlternative};

/// The p-values of one table under all three alternatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PValues {
    /// `P(X <= a)`
    pub less: f64,
    /// `P(X >= a)`
    pub greater: f64,
    /// Mass of all tables no more likely than the observed one.
    pub two_sided: f64,
}

impl PValues {
    /// Every p-value equal to one, the result for a single-point support.
    pub const ONE: Self = Self {
        less: 1.0,
        greater: 1.0,
        two_sided: 1.0,
    };

    /// Returns the p-value for `alternative`.
    #[inline]
    #[must_use]
    pub const fn get(&self, alternative: Alternative) -> f64 {
        match alternative {
            Alternative::Less => self.less,
            Alternative::Greater => self.greater,
            Alternative::TwoSided => self.two_sided,
        }
    }
}

/// Computes one p-value against an already-sized cache.
///
/// The cache must cover the table's total for full speed; uncovered entries
/// fall back to `ln Γ` and stay correct.
pub(crate) fn p_value_in(
    cache: &LogFactorialCache,
    table: &Table,
    alternative: Alternative,
    tolerance: f64,
) -> Result<f64> {
    let margins = table.margins()?;
    let pmf = HypergeometricPmf::new(cache, margins.row1, margins.col1, margins.n)?;
    if pmf.support().is_degenerate() {
        return Ok(1.0);
    }
    Ok(tail_p_value(&pmf, table.a, alternative, tolerance))
}

/// Computes all three p-values with a single mass setup.
pub(crate) fn p_values_in(
    cache: &LogFactorialCache,
    table: &Table,
    tolerance: f64,
) -> Result<PValues> {
    let margins = table.margins()?;
    let pmf = HypergeometricPmf::new(cache, margins.row1, margins.col1, margins.n)?;
    if pmf.support().is_degenerate() {
        return Ok(PValues::ONE);
    }
    Ok(PValues {
        less: less_tail(&pmf, table.a),
        greater: greater_tail(&pmf, table.a),
        two_sided: two_sided_tail(&pmf, table.a, tolerance),
    })
}

/// Fisher's exact test for the table `[[a, b], [c, d]]`, given as `[a, b, c, d]`.
///
/// Uses the process-wide log-factorial cache and the default two-sided
/// tolerance.
///
/// # Errors
///
/// - `Error::InvalidAlternative` for an unrecognized alternative token
/// - `Error::InvalidMargins` for a negative count or an overflowing total
/// - `Error::NumericConversion` for a count that does not fit in `u64`
///
/// # Example
///
/// ```
/// use fast_fisher::exact::fishers_exact;
///
/// let p = fishers_exact(&[1_u32, 2, 1, 5], "less").unwrap();
/// assert!((p - 0.916_666_666_666_665_9).abs() < 1e-12);
/// ```
#[must_use = "this returns a Result with the p-value, which should be used"]
pub fn fishers_exact<T: CountElement>(
    table: &[T; 4],
    alternative: impl IntoAlternative,
) -> Result<f64> {
    fishers_exact_with_cache(&SharedLogFactorialCache::global(), table, alternative)
}

/// [`fishers_exact`] against an explicit cache.
///
/// # Errors
///
/// Same as [`fishers_exact`].
pub fn fishers_exact_with_cache<T: CountElement>(
    cache: &SharedLogFactorialCache,
    table: &[T; 4],
    alternative: impl IntoAlternative,
) -> Result<f64> {
    let alternative = alternative.into_alternative()?;
    let table = Table::from_counts(table[0], table[1], table[2], table[3])?;
    let n = table.margins()?.n;
    let guard = cache.reserve(n);
    p_value_in(&guard, &table, alternative, DEFAULT_TWO_SIDED_TOLERANCE)
}

/// All three p-values for `[a, b, c, d]`.
///
/// # Errors
///
/// - `Error::InvalidMargins` for a negative count or an overflowing total
/// - `Error::NumericConversion` for a count that does not fit in `u64`
#[must_use = "this returns a Result with the p-values, which should be used"]
pub fn fishers_exact_all<T: CountElement>(table: &[T; 4]) -> Result<PValues> {
    let table = Table::from_counts(table[0], table[1], table[2], table[3])?;
    let n = table.margins()?.n;
    let cache = SharedLogFactorialCache::global();
    let guard = cache.reserve(n);
    p_values_in(&guard, &table, DEFAULT_TWO_SIDED_TOLERANCE)
}
