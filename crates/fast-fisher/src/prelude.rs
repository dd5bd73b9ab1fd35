//! Commonly used types and functions for convenient importing.
//!
//! # Usage
//!
//! ```
//! use fast_fisher::prelude::*;
//!
//! let p = exact(&[1_u64, 3], &[2, 5], &[1, 4], &[5, 50], Alternative::Greater).unwrap();
//! assert!(approx_eq(p[1], 0.039_707, LOOSE_EPSILON));
//!
//! let single = fishers_exact(&[3_u64, 5, 4, 50], "greater").unwrap();
//! assert_eq!(single, p[1]);
//! ```
//!
//! # Contents
//!
//! ## Error Handling
//! - [`Error`], [`Result`]
//!
//! ## Inputs
//! - [`Alternative`], [`Table`], [`CountElement`], [`IntoAlternative`]
//!
//! ## Batch API
//! - [`exact`], [`exact_with_odds_ratios`], [`exact_all`], [`exact_into`]
//! - [`BatchDispatcher`] and its [`ExactConfig`]
//!
//! ## Single-Table API
//! - [`fishers_exact`], [`fishers_exact_all`], [`fishers_exact_with_odds_ratio`], [`odds_ratio`]

// Error types
pub use crate::error::{Error, Result};

// Inputs
pub use crate::alternative::Alternative;
pub use crate::table::{Margins, Table};
pub use crate::traits::{CountElement, IntoAlternative};

// Batch API
pub use crate::batch::{exact, exact_all, exact_into, exact_with_odds_ratios, BatchDispatcher};
pub use crate::config::ExactConfig;

// Single-table API
pub use crate::exact::{fishers_exact, fishers_exact_all, PValues};
pub use crate::odds_ratio::{fishers_exact_with_odds_ratio, odds_ratio};

// Caches
pub use crate::kernels::log_factorial::SharedLogFactorialCache;

// Comparison helpers
pub use crate::utils::{approx_eq, approx_eq_relative, EPSILON, LOOSE_EPSILON};
