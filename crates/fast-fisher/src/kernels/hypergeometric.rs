//! Hypergeometric support and log-mass evaluation for 2x2 tables.
//!
//! With the margins of a table `[[a, b], [c, d]]` held fixed, the top-left
//! cell follows a hypergeometric distribution. This module computes its
//! support and evaluates its probability mass in log space.
//!
//! # Formula
//!
//! ```text
//! row1 = a + b   row2 = c + d   col1 = a + c   col2 = b + d   n = row1 + row2
//!
//! support:  lo = max(0, row1 - col2)    hi = min(row1, col1)
//!
//! ln P(X = k) = ln C(col1, k) + ln C(col2, row1 - k) - ln C(n, row1)
//!             = [ln row1! + ln row2! + ln col1! + ln col2! - ln n!]
//!               - ln k! - ln (col1 - k)! - ln (row1 - k)! - ln (col2 - row1 + k)!
//! ```
//!
//! The bracketed term is shared by every support point, so
//! [`HypergeometricPmf`] computes it once and each evaluation afterwards costs
//! four log-factorial lookups.
//!
//! The distribution is unimodal with mode
//! `floor((row1 + 1)(col1 + 1) / (n + 2))`: the mass is non-decreasing on
//! `[lo, mode]` and non-increasing on `[mode, hi]`.
//!
//! # Example
//!
//! ```
//! use fast_fisher::kernels::hypergeometric::{HypergeometricPmf, Support};
//! use fast_fisher::kernels::log_factorial::LogFactorialCache;
//!
//! // [[1, 2], [1, 5]]: row1 = 3, col1 = 2, n = 9
//! let support = Support::from_margins(3, 2, 9).unwrap();
//! assert_eq!((support.lo(), support.hi()), (0, 2));
//!
//! let mut cache = LogFactorialCache::new();
//! cache.grow_to(9);
//! let pmf = HypergeometricPmf::new(&cache, 3, 2, 9).unwrap();
//! assert!((pmf.pmf(1) - 42.0 / 84.0).abs() < 1e-12);
//! ```

use crate::error::{Error, Result};
use crate::kernels::log_factorial::LogFactorialCache;

/// The inclusive range `[lo, hi]` of feasible top-left cell values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Support {
    lo: u64,
    hi: u64,
    mode: u64,
}

impl Support {
    /// Computes the support from the first row total, first column total and
    /// grand total.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMargins` if `row1 > n` or `col1 > n`.
    pub fn from_margins(row1: u64, col1: u64, n: u64) -> Result<Self> {
        if row1 > n {
            return Err(Error::InvalidMargins {
                index: None,
                reason: "row total exceeds grand total",
            });
        }
        if col1 > n {
            return Err(Error::InvalidMargins {
                index: None,
                reason: "column total exceeds grand total",
            });
        }

        let col2 = n - col1;
        let lo = row1.saturating_sub(col2);
        let hi = row1.min(col1);

        let raw_mode = (u128::from(row1) + 1) * (u128::from(col1) + 1) / (u128::from(n) + 2);
        let mode = u64::try_from(raw_mode).unwrap_or(hi).clamp(lo, hi);

        Ok(Self { lo, hi, mode })
    }

    /// Smallest feasible value.
    #[inline]
    #[must_use]
    pub const fn lo(&self) -> u64 {
        self.lo
    }

    /// Largest feasible value.
    #[inline]
    #[must_use]
    pub const fn hi(&self) -> u64 {
        self.hi
    }

    /// A most likely value; the mass is non-decreasing up to it and
    /// non-increasing after it.
    #[inline]
    #[must_use]
    pub const fn mode(&self) -> u64 {
        self.mode
    }

    /// Number of support points.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.hi - self.lo + 1
    }

    /// `true` when the support is a single point, so every p-value is 1.
    #[inline]
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.lo == self.hi
    }

    /// Returns `true` if `k` lies in `[lo, hi]`.
    #[inline]
    #[must_use]
    pub const fn contains(&self, k: u64) -> bool {
        self.lo <= k && k <= self.hi
    }

    /// Offset of `k` from `lo`, or `None` if `k` is outside the support.
    #[inline]
    #[must_use]
    pub const fn position(&self, k: u64) -> Option<u64> {
        if self.contains(k) {
            Some(k - self.lo)
        } else {
            None
        }
    }
}

/// Log-space probability mass of the top-left cell for fixed margins.
#[derive(Debug, Clone, Copy)]
pub struct HypergeometricPmf<'c> {
    cache: &'c LogFactorialCache,
    support: Support,
    row1: u64,
    col1: u64,
    col2: u64,
    ln_norm: f64,
}

impl<'c> HypergeometricPmf<'c> {
    /// Prepares mass evaluation for the given margins.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMargins` if `row1 > n` or `col1 > n`.
    pub fn new(cache: &'c LogFactorialCache, row1: u64, col1: u64, n: u64) -> Result<Self> {
        let support = Support::from_margins(row1, col1, n)?;
        let row2 = n - row1;
        let col2 = n - col1;
        let ln_norm = cache.ln_factorial(row1)
            + cache.ln_factorial(row2)
            + cache.ln_factorial(col1)
            + cache.ln_factorial(col2)
            - cache.ln_factorial(n);

        Ok(Self {
            cache,
            support,
            row1,
            col1,
            col2,
            ln_norm,
        })
    }

    /// The support of the distribution.
    #[inline]
    #[must_use]
    pub const fn support(&self) -> Support {
        self.support
    }

    /// `ln P(X = k)`; negative infinity outside the support.
    #[inline]
    #[must_use]
    pub fn ln_pmf(&self, k: u64) -> f64 {
        if !self.support.contains(k) {
            return f64::NEG_INFINITY;
        }
        // lo <= k <= hi guarantees every argument below is non-negative.
        let lf = |x: u64| self.cache.ln_factorial(x);
        self.ln_norm
            - lf(k)
            - lf(self.col1 - k)
            - lf(self.row1 - k)
            - lf(self.col2 - (self.row1 - k))
    }

    /// `P(X = k)`; zero outside the support.
    #[inline]
    #[must_use]
    pub fn pmf(&self, k: u64) -> f64 {
        self.ln_pmf(k).exp()
    }
}
