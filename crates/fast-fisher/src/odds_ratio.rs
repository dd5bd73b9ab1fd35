//! Sample odds ratio.
//!
//! ```text
//! odds_ratio = (a * d) / (b * c)
//! ```
//!
//! This is the unconditional sample estimate, not the conditional maximum
//! likelihood estimate some statistics packages report alongside the exact
//! test. Products are formed in `f64`, so counts near `u64::MAX` lose
//! precision rather than overflow.
//!
//! | numerator | denominator | result   |
//! |-----------|-------------|----------|
//! | > 0       | 0           | `+inf`   |
//! | 0         | 0           | `NaN`    |
//! | any       | > 0         | quotient |

use crate::error::Result;
use crate::exact::fishers_exact;
use crate::table::Table;
use crate::traits::{CountElement, IntoAlternative};

/// Returns `(a * d) / (b * c)` in floating point.
///
/// # Example
///
/// ```
/// use fast_fisher::odds_ratio::odds_ratio;
///
/// assert_eq!(odds_ratio(1, 2, 1, 5), 2.5);
/// assert_eq!(odds_ratio(3, 5, 4, 50), 7.5);
/// assert_eq!(odds_ratio(1, 0, 1, 1), f64::INFINITY);
/// assert!(odds_ratio(0, 0, 1, 1).is_nan());
/// ```
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn odds_ratio(a: u64, b: u64, c: u64, d: u64) -> f64 {
    let numerator = a as f64 * d as f64;
    let denominator = b as f64 * c as f64;
    numerator / denominator
}

impl Table {
    /// The sample odds ratio of this table.
    #[inline]
    #[must_use]
    pub fn odds_ratio(&self) -> f64 {
        odds_ratio(self.a, self.b, self.c, self.d)
    }
}

/// Returns `(odds_ratio, p_value)` for `[a, b, c, d]`.
///
/// # Errors
///
/// Same as [`fishers_exact`].
///
/// # Example
///
/// ```
/// use fast_fisher::odds_ratio::fishers_exact_with_odds_ratio;
///
/// let (odds, p) = fishers_exact_with_odds_ratio(&[3_u64, 5, 4, 50], "greater").unwrap();
/// assert_eq!(odds, 7.5);
/// assert!((p - 0.039_707).abs() < 1e-6);
/// ```
#[must_use = "this returns a Result with the odds ratio and p-value, which should be used"]
pub fn fishers_exact_with_odds_ratio<T: CountElement>(
    table: &[T; 4],
    alternative: impl IntoAlternative,
) -> Result<(f64, f64)> {
    let p_value = fishers_exact(table, alternative)?;
    let table = Table::from_counts(table[0], table[1], table[2], table[3])?;
    Ok((table.odds_ratio(), p_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_plain_quotients() {
        assert_eq!(odds_ratio(1, 2, 1, 5), 2.5);
        assert_eq!(odds_ratio(3, 5, 4, 50), 7.5);
        assert_eq!(odds_ratio(0, 3, 4, 5), 0.0);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(odds_ratio(2, 0, 3, 4), f64::INFINITY);
        assert_eq!(odds_ratio(2, 3, 0, 4), f64::INFINITY);
        assert!(odds_ratio(0, 0, 3, 4).is_nan());
        assert!(odds_ratio(0, 0, 0, 0).is_nan());
        assert!(odds_ratio(2, 0, 3, 0).is_nan());
    }

    #[test]
    fn test_large_counts_do_not_overflow() {
        let big = u64::MAX;
        let ratio = odds_ratio(big, big, big, big);
        assert!((ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_with_p_value() {
        let (odds, p) = fishers_exact_with_odds_ratio(&[1_u64, 2, 1, 5], "greater").unwrap();
        assert_eq!(odds, 2.5);
        assert!((p - 0.583_333_333_333_332_8).abs() < 1e-12);

        assert!(matches!(
            fishers_exact_with_odds_ratio(&[1_u64, 2, 1, 5], "up"),
            Err(Error::InvalidAlternative { .. })
        ));
    }

    #[test]
    fn test_table_method() {
        assert_eq!(Table::new(3, 5, 4, 50).odds_ratio(), 7.5);
    }
}
