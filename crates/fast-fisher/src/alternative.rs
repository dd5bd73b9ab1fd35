//! Alternative hypothesis selection.
//!
//! The alternative decides which part of the hypergeometric support is summed:
//!
//! ```text
//! Less      P(X <= a)
//! Greater   P(X >= a)
//! TwoSided  sum of P(X = k) over every k with P(X = k) <= P(X = a) * (1 + tol)
//! ```
//!
//! Batch entry points accept anything implementing
//! [`IntoAlternative`](crate::traits::IntoAlternative), so a string token is
//! parsed once per batch rather than once per table.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The alternative hypothesis of a Fisher exact test.
#[derive(Debug, Clone, Copy, Default, Hash, PartialEq, Eq)]
pub enum Alternative {
    /// The odds ratio of the underlying population is less than one.
    Less,
    /// The odds ratio of the underlying population is greater than one.
    Greater,
    /// The odds ratio of the underlying population is not one.
    #[default]
    TwoSided,
}

impl Alternative {
    /// All alternatives, in the order `less`, `greater`, `two-sided`.
    pub const ALL: [Self; 3] = [Self::Less, Self::Greater, Self::TwoSided];

    /// Returns the canonical token for this alternative.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Less => "less",
            Self::Greater => "greater",
            Self::TwoSided => "two-sided",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "less" => Ok(Self::Less),
            "greater" => Ok(Self::Greater),
            "two-sided" => Ok(Self::TwoSided),
            other => Err(Error::InvalidAlternative {
                value: other.to_string(),
            }),
        }
    }
}
