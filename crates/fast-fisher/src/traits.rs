//! Core traits for fast-fisher inputs.
//!
//! # Overview
//!
//! [`CountElement`] abstracts over the integer types a caller may hold cell
//! counts in (`u8` through `u64`, `usize`, and the signed types), converting
//! each one to the `u64` the engine works in. [`IntoAlternative`] lets batch
//! entry points accept either an [`Alternative`] or its string token, resolved
//! once per batch. [`validate_batch_shape`] enforces the equal-length rule.
//!
//! # Example
//!
//! ```
//! use fast_fisher::traits::{validate_batch_shape, CountElement};
//!
//! let a = [1_u32, 3];
//! let b = [2_u32, 5];
//! let c = [1_u32, 4];
//! let d = [5_u32, 50];
//! assert_eq!(validate_batch_shape(&a, &b, &c, &d).unwrap(), 2);
//! assert_eq!(d[1].to_count().unwrap(), 50_u64);
//! ```

use num_traits::{PrimInt, ToPrimitive};

use crate::alternative::Alternative;
use crate::error::{Error, Result};

/// A type that can hold a contingency-table cell count.
///
/// Implemented for every primitive integer. Negative values are rejected with
/// [`Error::InvalidMargins`]; values that do not fit in `u64` (large `u128`)
/// are rejected with [`Error::NumericConversion`].
///
/// # Example
///
/// ```
/// use fast_fisher::traits::CountElement;
///
/// assert_eq!(7_i64.to_count().unwrap(), 7);
/// assert!((-1_i32).to_count().is_err());
/// ```
pub trait CountElement: PrimInt + ToPrimitive + Send + Sync + 'static {
    /// Converts the count to `u64`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidMargins` if the value is negative
    /// - `Error::NumericConversion` if the value exceeds `u64::MAX`
    #[inline]
    fn to_count(self) -> Result<u64> {
        if self < Self::zero() {
            return Err(Error::InvalidMargins {
                index: None,
                reason: "negative cell count",
            });
        }
        self.to_u64().ok_or(Error::NumericConversion {
            context: "cell count to u64",
        })
    }
}

impl<T: PrimInt + ToPrimitive + Send + Sync + 'static> CountElement for T {}

/// Conversion into an [`Alternative`], performed once at batch entry.
pub trait IntoAlternative {
    /// Resolves the alternative hypothesis.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAlternative` if a string token is not one of
    /// `less`, `greater`, `two-sided`.
    fn into_alternative(self) -> Result<Alternative>;
}

impl IntoAlternative for Alternative {
    #[inline]
    fn into_alternative(self) -> Result<Alternative> {
        Ok(self)
    }
}

impl IntoAlternative for &str {
    #[inline]
    fn into_alternative(self) -> Result<Alternative> {
        self.parse()
    }
}

impl IntoAlternative for &String {
    #[inline]
    fn into_alternative(self) -> Result<Alternative> {
        self.parse()
    }
}

impl IntoAlternative for String {
    #[inline]
    fn into_alternative(self) -> Result<Alternative> {
        self.parse()
    }
}

/// Validates that the four batch inputs have identical lengths.
///
/// Returns the common length, which is also the output length.
///
/// # Errors
///
/// Returns `Error::ShapeMismatch` naming the first input whose length differs
/// from `a`.
#[inline]
pub fn validate_batch_shape<T>(a: &[T], b: &[T], c: &[T], d: &[T]) -> Result<usize> {
    let expected = a.len();
    for (input, actual) in [("b", b.len()), ("c", c.len()), ("d", d.len())] {
        if actual != expected {
            return Err(Error::ShapeMismatch {
                input,
                expected,
                actual,
            });
        }
    }
    Ok(expected)
}
