//! Batched evaluation over four parallel count arrays.
//!
//! A batch is four equal-length slices `a`, `b`, `c`, `d`; index `i` is the
//! table `[[a[i], b[i]], [c[i], d[i]]]`. Every table is independent, so the
//! batch is split into contiguous chunks that rayon's workers evaluate in any
//! order while each writes only its own slice of the output.
//!
//! # Phases
//!
//! 1. Resolve the alternative and check the four lengths.
//! 2. Convert every count and check every total, on the calling thread, so a
//!    bad batch always reports the same (lowest) failing index and produces
//!    no output.
//! 3. Grow the log-factorial cache to the largest total and take a snapshot
//!    of it; no lock is held while tables are evaluated.
//! 4. Evaluate chunks in parallel, or sequentially for short batches.
//!
//! # Feature Flag
//!
//! Parallel evaluation requires the `parallel` feature (enabled by default).
//! Without it every path runs sequentially and produces identical results.
//!
//! # Example
//!
//! ```
//! use fast_fisher::batch::{exact, exact_with_odds_ratios};
//!
//! let a = [1_u64, 3];
//! let b = [2_u64, 5];
//! let c = [1_u64, 4];
//! let d = [5_u64, 50];
//!
//! let p = exact(&a, &b, &c, &d, "greater").unwrap();
//! assert!((p[0] - 0.583_333).abs() < 1e-6);
//! assert!((p[1] - 0.039_707).abs() < 1e-6);
//!
//! let (odds, _) = exact_with_odds_ratios(&a, &b, &c, &d, "greater").unwrap();
//! assert_eq!(odds, vec![2.5, 7.5]);
//! ```

#[cfg(feature = "parallel")]
use std::sync::Arc;

use crate::alternative::Alternative;
use crate::config::ExactConfig;
use crate::error::{Error, Result};
use crate::exact::{p_value_in, p_values_in, PValues};
use crate::kernels::log_factorial::{LogFactorialCache, SharedLogFactorialCache, DEFAULT_TABLE_LIMIT};
use crate::table::Table;
use crate::traits::{validate_batch_shape, CountElement, IntoAlternative};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evaluates Fisher exact tests over batches of tables.
///
/// Holds an [`ExactConfig`], a log-factorial cache handle and, when the
/// configuration asks for a fixed worker count, a dedicated thread pool.
/// Cloning is cheap and shares both the cache and the pool.
#[derive(Debug, Clone)]
pub struct BatchDispatcher {
    config: ExactConfig,
    cache: SharedLogFactorialCache,
    #[cfg(feature = "parallel")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Default for BatchDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchDispatcher {
    /// Creates a dispatcher with the default configuration, the global rayon
    /// pool and the process-wide cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ExactConfig::default(),
            cache: SharedLogFactorialCache::global(),
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    /// Creates a dispatcher from a configuration.
    ///
    /// A non-default `table_limit` gets its own cache; otherwise the
    /// process-wide cache is used. A non-zero `num_threads` builds a
    /// dedicated pool.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the configuration fails
    /// [`ExactConfig::validate`] or the thread pool cannot be built.
    pub fn with_config(config: ExactConfig) -> Result<Self> {
        config.validate()?;

        let cache = if config.get_table_limit() == DEFAULT_TABLE_LIMIT {
            SharedLogFactorialCache::global()
        } else {
            SharedLogFactorialCache::with_limit(config.get_table_limit())
        };

        Ok(Self {
            config,
            cache,
            #[cfg(feature = "parallel")]
            pool: build_pool(config.get_num_threads())?,
        })
    }

    /// Replaces the cache handle.
    #[must_use]
    pub fn with_cache(mut self, cache: SharedLogFactorialCache) -> Self {
        self.cache = cache;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExactConfig {
        &self.config
    }

    /// Returns the cache handle.
    #[must_use]
    pub const fn cache(&self) -> &SharedLogFactorialCache {
        &self.cache
    }

    /// Computes one p-value per table.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidAlternative` for an unrecognized alternative token
    /// - `Error::ShapeMismatch` if the four slices differ in length
    /// - `Error::InvalidMargins` for a negative count or an overflowing total
    /// - `Error::NumericConversion` for a count that does not fit in `u64`
    ///
    /// Any error fails the whole batch.
    #[must_use = "this returns a Result with the p-values, which should be used"]
    pub fn exact<T: CountElement>(
        &self,
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
        alternative: impl IntoAlternative,
    ) -> Result<Vec<f64>> {
        let alternative = alternative.into_alternative().map_err(rejected)?;
        let tables = collect_tables(a, b, c, d).map_err(rejected)?;
        let mut out = vec![0.0; tables.len()];
        self.p_values_into(&tables, alternative, &mut out)?;
        Ok(out)
    }

    /// Computes p-values into a caller-provided buffer.
    ///
    /// Returns the number of values written, which is the batch length.
    /// Elements of `out` past the batch length are left untouched.
    ///
    /// # Errors
    ///
    /// As [`exact`](Self::exact), plus `Error::BufferTooSmall` if `out` is
    /// shorter than the batch.
    pub fn exact_into<T: CountElement>(
        &self,
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
        alternative: impl IntoAlternative,
        out: &mut [f64],
    ) -> Result<usize> {
        let alternative = alternative.into_alternative().map_err(rejected)?;
        let len = validate_batch_shape(a, b, c, d).map_err(rejected)?;
        if out.len() < len {
            return Err(rejected(Error::BufferTooSmall {
                required: len,
                actual: out.len(),
            }));
        }
        let tables = collect_tables(a, b, c, d).map_err(rejected)?;
        self.p_values_into(&tables, alternative, &mut out[..len])?;
        Ok(len)
    }

    /// Computes `(odds_ratios, p_values)`, index-aligned with the input.
    ///
    /// # Errors
    ///
    /// Same as [`exact`](Self::exact).
    #[must_use = "this returns a Result with the odds ratios and p-values, which should be used"]
    pub fn exact_with_odds_ratios<T: CountElement>(
        &self,
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
        alternative: impl IntoAlternative,
    ) -> Result<(Vec<f64>, Vec<f64>)> {
        let alternative = alternative.into_alternative().map_err(rejected)?;
        let tables = collect_tables(a, b, c, d).map_err(rejected)?;

        let mut p_values = vec![0.0; tables.len()];
        self.p_values_into(&tables, alternative, &mut p_values)?;

        let mut odds_ratios = vec![0.0; tables.len()];
        self.fill(&tables, &mut odds_ratios, |table| Ok(table.odds_ratio()))?;

        Ok((odds_ratios, p_values))
    }

    /// Computes `(less, greater, two_sided)` p-values for every table.
    ///
    /// Each table's mass function is set up once and shared by the three
    /// tail sums.
    ///
    /// # Errors
    ///
    /// Same as [`exact`](Self::exact), minus the alternative check.
    #[must_use = "this returns a Result with the p-values, which should be used"]
    pub fn exact_all<T: CountElement>(
        &self,
        a: &[T],
        b: &[T],
        c: &[T],
        d: &[T],
    ) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
        let tables = collect_tables(a, b, c, d).map_err(rejected)?;
        let guard = self.reserve(&tables);
        let cache: &LogFactorialCache = &guard;
        let tolerance = self.config.get_two_sided_tolerance();
        self.trace_dispatch(&tables, "all");

        let mut all = vec![PValues::ONE; tables.len()];
        self.fill(&tables, &mut all, |table| {
            p_values_in(cache, table, tolerance)
        })?;

        let less = all.iter().map(|p| p.less).collect();
        let greater = all.iter().map(|p| p.greater).collect();
        let two_sided = all.iter().map(|p| p.two_sided).collect();
        Ok((less, greater, two_sided))
    }

    fn p_values_into(
        &self,
        tables: &[Table],
        alternative: Alternative,
        out: &mut [f64],
    ) -> Result<()> {
        let guard = self.reserve(tables);
        let cache: &LogFactorialCache = &guard;
        let tolerance = self.config.get_two_sided_tolerance();
        self.trace_dispatch(tables, alternative.as_str());

        self.fill(tables, out, |table| {
            p_value_in(cache, table, alternative, tolerance)
        })
    }

    /// Grows the cache to the largest total in the batch.
    fn reserve(&self, tables: &[Table]) -> std::sync::Arc<LogFactorialCache> {
        let max_n = tables
            .iter()
            .map(|t| t.total().unwrap_or(u64::MAX))
            .max()
            .unwrap_or(0);
        self.cache.reserve(max_n)
    }

    fn trace_dispatch(&self, tables: &[Table], alternative: &str) {
        tracing::debug!(
            len = tables.len(),
            alternative,
            parallel = self.runs_parallel(tables.len()),
            chunk_size = self.config.get_chunk_size(),
            "dispatching batch"
        );
    }

    #[cfg(feature = "parallel")]
    fn runs_parallel(&self, len: usize) -> bool {
        len > 0 && len >= self.config.get_min_parallel_threshold()
    }

    #[cfg(not(feature = "parallel"))]
    fn runs_parallel(&self, _len: usize) -> bool {
        false
    }

    /// Writes `eval(&tables[i])` into `out[i]` for every `i`.
    #[cfg(feature = "parallel")]
    fn fill<O, F>(&self, tables: &[Table], out: &mut [O], eval: F) -> Result<()>
    where
        O: Send,
        F: Fn(&Table) -> Result<O> + Send + Sync,
    {
        if !self.runs_parallel(tables.len()) {
            return fill_sequential(tables, out, &eval);
        }

        let chunk = self.config.get_chunk_size();
        let mut run = || {
            out.par_chunks_mut(chunk)
                .zip(tables.par_chunks(chunk))
                .try_for_each(|(out, tables)| fill_sequential(tables, out, &eval))
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Sequential version when parallel feature is disabled.
    #[cfg(not(feature = "parallel"))]
    fn fill<O, F>(&self, tables: &[Table], out: &mut [O], eval: F) -> Result<()>
    where
        F: Fn(&Table) -> Result<O>,
    {
        fill_sequential(tables, out, &eval)
    }
}

fn fill_sequential<O, F>(tables: &[Table], out: &mut [O], eval: &F) -> Result<()>
where
    F: Fn(&Table) -> Result<O>,
{
    for (slot, table) in out.iter_mut().zip(tables) {
        *slot = eval(table)?;
    }
    Ok(())
}

/// Converts and checks every table of the batch.
///
/// Errors carry the index of the first offending table.
fn collect_tables<T: CountElement>(a: &[T], b: &[T], c: &[T], d: &[T]) -> Result<Vec<Table>> {
    let len = validate_batch_shape(a, b, c, d)?;
    (0..len)
        .map(|i| {
            let table = Table::from_counts(a[i], b[i], c[i], d[i]).map_err(|e| e.at_index(i))?;
            table.margins().map_err(|e| e.at_index(i))?;
            Ok(table)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn build_pool(num_threads: usize) -> Result<Option<Arc<rayon::ThreadPool>>> {
    if num_threads == 0 {
        return Ok(None);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("fast-fisher-{i}"))
        .build()
        .map_err(|_| Error::InvalidConfig {
            parameter: "num_threads",
            reason: "failed to build thread pool",
        })?;
    Ok(Some(Arc::new(pool)))
}

fn rejected(err: Error) -> Error {
    tracing::warn!(error = %err, "batch rejected");
    err
}

/// Computes one p-value per table with a default [`BatchDispatcher`].
///
/// # Errors
///
/// See [`BatchDispatcher::exact`].
pub fn exact<T: CountElement>(
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
    alternative: impl IntoAlternative,
) -> Result<Vec<f64>> {
    BatchDispatcher::new().exact(a, b, c, d, alternative)
}

/// Computes `(odds_ratios, p_values)` with a default [`BatchDispatcher`].
///
/// # Errors
///
/// See [`BatchDispatcher::exact_with_odds_ratios`].
pub fn exact_with_odds_ratios<T: CountElement>(
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
    alternative: impl IntoAlternative,
) -> Result<(Vec<f64>, Vec<f64>)> {
    BatchDispatcher::new().exact_with_odds_ratios(a, b, c, d, alternative)
}

/// Computes `(less, greater, two_sided)` with a default [`BatchDispatcher`].
///
/// # Errors
///
/// See [`BatchDispatcher::exact_all`].
pub fn exact_all<T: CountElement>(
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    BatchDispatcher::new().exact_all(a, b, c, d)
}

/// Computes p-values into `out` with a default [`BatchDispatcher`].
///
/// # Errors
///
/// See [`BatchDispatcher::exact_into`].
pub fn exact_into<T: CountElement>(
    a: &[T],
    b: &[T],
    c: &[T],
    d: &[T],
    alternative: impl IntoAlternative,
    out: &mut [f64],
) -> Result<usize> {
    BatchDispatcher::new().exact_into(a, b, c, d, alternative, out)
}
