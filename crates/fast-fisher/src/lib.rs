//! fast-fisher: batched Fisher's exact test for 2x2 contingency tables
//!
//! This crate computes Fisher exact test p-values and sample odds ratios for
//! millions of independent 2x2 tables, element-wise over four count arrays.
//!
//! # Features
//!
//! - **Performance**: shared log-factorial table, tail sums anchored at the
//!   mode with early termination, chunked rayon parallelism
//! - **Accuracy**: log-space accumulation; validated against reference
//!   hypergeometric implementations for margins beyond 10^5
//! - **Generics**: counts in any primitive integer type
//! - **Safety**: every failure is a [`Result`]; bad batches produce no output
//!
//! # Quick Start
//!
//! ```
//! use fast_fisher::prelude::*;
//!
//! let a = [1_u64, 3];
//! let b = [2_u64, 5];
//! let c = [1_u64, 4];
//! let d = [5_u64, 50];
//!
//! let p = exact(&a, &b, &c, &d, "two-sided").unwrap();
//! assert!((p[0] - 1.0).abs() < 1e-12);
//! assert!((p[1] - 0.039_707).abs() < 1e-6);
//!
//! let (odds, p) = exact_with_odds_ratios(&a, &b, &c, &d, Alternative::Greater).unwrap();
//! assert_eq!(odds, vec![2.5, 7.5]);
//! assert!((p[0] - 0.583_333).abs() < 1e-6);
//! ```
//!
//! # Alternatives
//!
//! - [`Alternative::Less`]: `P(X <= a)`
//! - [`Alternative::Greater`]: `P(X >= a)`
//! - [`Alternative::TwoSided`]: mass of every table at most
//!   `(1 + 1e-7)` times as likely as the observed one
//!
//! # Error Handling
//!
//! ```
//! use fast_fisher::prelude::*;
//!
//! // Unequal lengths
//! let result = exact(&[1_u64, 2], &[1, 2], &[1, 2], &[1, 2, 3], "less");
//! assert!(matches!(result, Err(Error::ShapeMismatch { input: "d", .. })));
//!
//! // Unknown alternative
//! let result = exact(&[1_u64], &[1], &[1], &[1], "both");
//! assert!(matches!(result, Err(Error::InvalidAlternative { .. })));
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::needless_collect)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::useless_conversion)]
#![allow(clippy::module_name_repetitions)]

pub mod alternative;
pub mod batch;
pub mod config;
pub mod error;
pub mod exact;
pub mod kernels;
pub mod odds_ratio;
pub mod prelude;
pub mod table;
pub mod traits;
pub mod utils;

// Re-export commonly used types at crate root
pub use alternative::Alternative;
pub use batch::{exact, exact_all, exact_into, exact_with_odds_ratios, BatchDispatcher};
pub use config::ExactConfig;
pub use error::{Error, Result};
pub use exact::{fishers_exact, fishers_exact_all, PValues};
pub use odds_ratio::{fishers_exact_with_odds_ratio, odds_ratio};
pub use table::Table;
pub use traits::{CountElement, IntoAlternative};
pub use utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
