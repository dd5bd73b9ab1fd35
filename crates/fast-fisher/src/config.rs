//! Tuning knobs for batch evaluation.
//!
//! # Example
//!
//! ```
//! use fast_fisher::config::ExactConfig;
//!
//! let config = ExactConfig::new()
//!     .chunk_size(1024)
//!     .num_threads(4)
//!     .two_sided_tolerance(1e-9);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.get_chunk_size(), 1024);
//! ```

use crate::error::{Error, Result};
use crate::kernels::log_factorial::DEFAULT_TABLE_LIMIT;
use crate::kernels::tail::DEFAULT_TWO_SIDED_TOLERANCE;

/// Default number of tables below which a batch runs sequentially.
pub const DEFAULT_MIN_PARALLEL_THRESHOLD: usize = 1000;

/// Default number of tables per parallel work unit.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration of a [`BatchDispatcher`](crate::batch::BatchDispatcher).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExactConfig {
    two_sided_tolerance: f64,
    min_parallel_threshold: usize,
    chunk_size: usize,
    num_threads: usize,
    table_limit: usize,
}

impl Default for ExactConfig {
    /// Tolerance 1e-7, parallel from 1000 tables, chunks of 4096, the global
    /// rayon pool and a 2^20-entry log-factorial table.
    fn default() -> Self {
        Self {
            two_sided_tolerance: DEFAULT_TWO_SIDED_TOLERANCE,
            min_parallel_threshold: DEFAULT_MIN_PARALLEL_THRESHOLD,
            chunk_size: DEFAULT_CHUNK_SIZE,
            num_threads: 0,
            table_limit: DEFAULT_TABLE_LIMIT,
        }
    }
}

impl ExactConfig {
    /// Creates a configuration with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the relative tolerance used to decide which tables are "as or
    /// less likely" than the observed one in the two-sided test.
    ///
    /// Default: 1e-7
    #[must_use]
    pub const fn two_sided_tolerance(mut self, tolerance: f64) -> Self {
        self.two_sided_tolerance = tolerance;
        self
    }

    /// Sets the batch length below which evaluation stays on the calling thread.
    ///
    /// Default: 1000
    #[must_use]
    pub const fn min_parallel_threshold(mut self, threshold: usize) -> Self {
        self.min_parallel_threshold = threshold;
        self
    }

    /// Sets the number of tables handed to a worker at a time.
    ///
    /// Default: 4096
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets the worker count. Zero uses rayon's global pool.
    ///
    /// Default: 0
    #[must_use]
    pub const fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Sets the largest `k` kept in a log-factorial table created for this
    /// configuration.
    ///
    /// Default: 2^20
    #[must_use]
    pub const fn table_limit(mut self, limit: usize) -> Self {
        self.table_limit = limit;
        self
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if:
    /// - the tolerance is negative or not finite
    /// - the chunk size is zero
    /// - the table limit is zero
    pub fn validate(&self) -> Result<()> {
        if !self.two_sided_tolerance.is_finite() || self.two_sided_tolerance < 0.0 {
            return Err(Error::InvalidConfig {
                parameter: "two_sided_tolerance",
                reason: "must be finite and non-negative",
            });
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig {
                parameter: "chunk_size",
                reason: "must be at least 1",
            });
        }
        if self.table_limit == 0 {
            return Err(Error::InvalidConfig {
                parameter: "table_limit",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Returns the two-sided tolerance.
    #[must_use]
    pub const fn get_two_sided_tolerance(&self) -> f64 {
        self.two_sided_tolerance
    }

    /// Returns the parallel threshold.
    #[must_use]
    pub const fn get_min_parallel_threshold(&self) -> usize {
        self.min_parallel_threshold
    }

    /// Returns the chunk size.
    #[must_use]
    pub const fn get_chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Returns the worker count (0 = global pool).
    #[must_use]
    pub const fn get_num_threads(&self) -> usize {
        self.num_threads
    }

    /// Returns the log-factorial table limit.
    #[must_use]
    pub const fn get_table_limit(&self) -> usize {
        self.table_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExactConfig::default();
        assert_eq!(config.get_two_sided_tolerance(), 1e-7);
        assert_eq!(config.get_min_parallel_threshold(), 1000);
        assert_eq!(config.get_chunk_size(), 4096);
        assert_eq!(config.get_num_threads(), 0);
        assert_eq!(config.get_table_limit(), 1 << 20);
        assert!(config.validate().is_ok());
        assert_eq!(ExactConfig::new(), config);
    }

    #[test]
    fn test_fluent_setters() {
        let config = ExactConfig::new()
            .two_sided_tolerance(0.0)
            .min_parallel_threshold(0)
            .chunk_size(1)
            .num_threads(3)
            .table_limit(10);
        assert_eq!(config.get_two_sided_tolerance(), 0.0);
        assert_eq!(config.get_min_parallel_threshold(), 0);
        assert_eq!(config.get_chunk_size(), 1);
        assert_eq!(config.get_num_threads(), 3);
        assert_eq!(config.get_table_limit(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        for tol in [-1e-9, f64::NAN, f64::INFINITY] {
            let err = ExactConfig::new().two_sided_tolerance(tol).validate();
            assert!(matches!(
                err,
                Err(Error::InvalidConfig {
                    parameter: "two_sided_tolerance",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        assert!(matches!(
            ExactConfig::new().chunk_size(0).validate(),
            Err(Error::InvalidConfig {
                parameter: "chunk_size",
                ..
            })
        ));
        assert!(matches!(
            ExactConfig::new().table_limit(0).validate(),
            Err(Error::InvalidConfig {
                parameter: "table_limit",
                ..
            })
        ));
    }
}
