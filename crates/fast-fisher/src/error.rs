//! Error types for fast-fisher.
//!
//! Every failure is a deterministic function of the input: calling again with
//! the same arguments reproduces the same error. Degenerate numeric cases
//! (zero margins, zero odds-ratio denominators) are not errors; they have
//! defined boundary values.

use thiserror::Error;

/// The main error type for fast-fisher operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The four input sequences of a batch do not have the same length.
    ///
    /// Reported before any computation; no partial output is produced.
    #[error("shape mismatch: input `{input}` has {actual} elements, expected {expected}")]
    ShapeMismatch {
        /// Name of the offending input (`"b"`, `"c"` or `"d"`).
        input: &'static str,
        /// The length of the first input, which defines the batch length.
        expected: usize,
        /// The length of the offending input.
        actual: usize,
    },

    /// The alternative hypothesis token is not one of `less`, `greater`, `two-sided`.
    #[error("invalid alternative '{value}': expected one of 'less', 'greater', 'two-sided'")]
    InvalidAlternative {
        /// The token that was provided.
        value: String,
    },

    /// A table's cells or derived margins are inconsistent.
    ///
    /// Raised for negative counts and for tables whose total overflows `u64`.
    /// In a batch this fails the whole call.
    #[error("invalid margins{}: {reason}", index_suffix(.index))]
    InvalidMargins {
        /// Position of the table in the batch, if it came from one.
        index: Option<usize>,
        /// Description of the inconsistency.
        reason: &'static str,
    },

    /// The output buffer passed to an `_into` function is too small.
    #[error("buffer too small: required {required} elements, got {actual}")]
    BufferTooSmall {
        /// The number of elements required.
        required: usize,
        /// The number of elements provided.
        actual: usize,
    },

    /// Failed to convert a count to `u64`.
    #[error("numeric conversion failed: {context}")]
    NumericConversion {
        /// Description of the conversion that failed.
        context: &'static str,
    },

    /// A configuration parameter is out of range.
    #[error("invalid configuration for `{parameter}`: {reason}")]
    InvalidConfig {
        /// Name of the parameter.
        parameter: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl Error {
    /// Attaches a batch position to an [`Error::InvalidMargins`] error.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn at_index(self, position: usize) -> Self {
        match self {
            Self::InvalidMargins { reason, .. } => Self::InvalidMargins {
                index: Some(position),
                reason,
            },
            other => other,
        }
    }
}

fn index_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" at index {i}")).unwrap_or_default()
}

/// Convenience type alias for Results using the fast-fisher Error type.
pub type Result<T> = std::result::Result<T, Error>;
