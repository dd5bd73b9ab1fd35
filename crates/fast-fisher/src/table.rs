//! The 2x2 contingency table and its margins.
//!
//! ```text
//!            col 1   col 2
//!   row 1      a       b      row1 = a + b
//!   row 2      c       d      row2 = c + d
//!            col1    col2     n    = row1 + row2
//! ```

use crate::error::{Error, Result};
use crate::traits::CountElement;

/// A 2x2 table `[[a, b], [c, d]]` of non-negative counts.
///
/// # Example
///
/// ```
/// use fast_fisher::table::Table;
///
/// let table = Table::new(3, 5, 4, 50);
/// let margins = table.margins().unwrap();
/// assert_eq!((margins.row1, margins.col1, margins.n), (8, 7, 62));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Table {
    /// Top-left cell.
    pub a: u64,
    /// Top-right cell.
    pub b: u64,
    /// Bottom-left cell.
    pub c: u64,
    /// Bottom-right cell.
    pub d: u64,
}

/// Row, column and grand totals of a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Margins {
    /// `a + b`
    pub row1: u64,
    /// `c + d`
    pub row2: u64,
    /// `a + c`
    pub col1: u64,
    /// `b + d`
    pub col2: u64,
    /// `a + b + c + d`
    pub n: u64,
}

impl Table {
    /// Creates a table from its four cells.
    #[inline]
    #[must_use]
    pub const fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self { a, b, c, d }
    }

    /// Creates a table from `[a, b, c, d]`.
    #[inline]
    #[must_use]
    pub const fn from_array(cells: [u64; 4]) -> Self {
        Self::new(cells[0], cells[1], cells[2], cells[3])
    }

    /// Creates a table from counts of any integer type.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMargins` for a negative count and
    /// `Error::NumericConversion` for a count above `u64::MAX`.
    pub fn from_counts<T: CountElement>(a: T, b: T, c: T, d: T) -> Result<Self> {
        Ok(Self::new(
            a.to_count()?,
            b.to_count()?,
            c.to_count()?,
            d.to_count()?,
        ))
    }

    /// Returns `[a, b, c, d]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [u64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Computes the margins.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMargins` if the grand total overflows `u64`.
    #[inline]
    pub fn margins(&self) -> Result<Margins> {
        const OVERFLOW: Error = Error::InvalidMargins {
            index: None,
            reason: "table total overflows u64",
        };

        let row1 = self.a.checked_add(self.b).ok_or(OVERFLOW)?;
        let row2 = self.c.checked_add(self.d).ok_or(OVERFLOW)?;
        let n = row1.checked_add(row2).ok_or(OVERFLOW)?;
        // Both column sums are bounded by n, so they cannot overflow.
        Ok(Margins {
            row1,
            row2,
            col1: self.a + self.c,
            col2: self.b + self.d,
            n,
        })
    }

    /// Returns the grand total, or `None` on overflow.
    #[inline]
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.a
            .checked_add(self.b)?
            .checked_add(self.c)?
            .checked_add(self.d)
    }
}

impl From<[u64; 4]> for Table {
    fn from(cells: [u64; 4]) -> Self {
        Self::from_array(cells)
    }
}
