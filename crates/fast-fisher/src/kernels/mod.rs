//! Numeric kernels behind the exact test.
//!
//! Each kernel is a small, independently testable building block; the
//! per-table and batch entry points in the crate root compose them.
//!
//! # Kernels
//!
//! - [`log_factorial`]: growable `ln(k!)` table with a shared, lock-protected variant
//! - [`hypergeometric`]: support bounds, mode and log-mass of the top-left cell
//! - [`log_sum_exp`]: streaming accumulator for sums supplied in log space
//! - [`tail`]: mode-anchored tail summation for the three alternatives
//!
//! # Numeric Stability
//!
//! Masses are only ever handled in log space and summed with [`LogSumExp`],
//! so tables whose p-values are far below `f64::MIN_POSITIVE` relative to
//! their largest term still keep full relative precision until the final
//! exponentiation.

pub mod hypergeometric;
pub mod log_factorial;
pub mod log_sum_exp;
pub mod tail;

pub use hypergeometric::{HypergeometricPmf, Support};
pub use log_factorial::{LogFactorialCache, SharedLogFactorialCache, DEFAULT_TABLE_LIMIT};
pub use log_sum_exp::LogSumExp;
pub use tail::{greater_tail, less_tail, tail_p_value, two_sided_tail, DEFAULT_TWO_SIDED_TOLERANCE};
