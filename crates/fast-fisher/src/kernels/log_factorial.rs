//! Log-factorial lookup table.
//!
//! Every hypergeometric mass is a sum of a handful of `ln(k!)` terms, and a
//! batch of millions of tables asks for the same small set of `k` over and
//! over. [`LogFactorialCache`] tabulates `ln(k!)` once and answers each
//! lookup with a single array load.
//!
//! # Algorithm
//!
//! The table is extended with the recurrence
//!
//! ```text
//! ln(k!) = ln((k-1)!) + ln(k)
//! ```
//!
//! using Neumaier-compensated summation, so the accumulated rounding error
//! stays at a few ulps of `ln(k!)` instead of growing with `k`. The table never
//! grows past its `limit`; beyond it `ln(k!)` is evaluated directly as
//! `ln Γ(k + 1)`, which keeps memory bounded for counts in the `u64` range.
//!
//! # Sharing
//!
//! [`SharedLogFactorialCache`] holds the current table as an
//! `Arc<LogFactorialCache>` behind a `RwLock`. A batch calls
//! [`SharedLogFactorialCache::reserve`] once with its largest margin and gets
//! back an immutable snapshot; the lock is released before the batch runs, so
//! worker threads never touch it. Growth is copy-on-write: a snapshot still in
//! use keeps its old table while later callers see the extended one.
//! [`SharedLogFactorialCache::global`] is the process-wide instance; it grows
//! monotonically and is never reset.
//!
//! # Example
//!
//! ```
//! use fast_fisher::kernels::log_factorial::LogFactorialCache;
//!
//! let mut cache = LogFactorialCache::new();
//! cache.grow_to(10);
//! assert!((cache.ln_factorial(5) - 120.0_f64.ln()).abs() < 1e-12);
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;
use statrs::function::gamma::ln_gamma;

/// Default largest `k` tabulated: 2^20 entries, 8 MiB.
pub const DEFAULT_TABLE_LIMIT: usize = 1 << 20;

/// A table of `ln(k!)` for `k` in `0..len()`, with `ln Γ(k + 1)` beyond it.
#[derive(Debug, Clone)]
pub struct LogFactorialCache {
    table: Vec<f64>,
    running_sum: f64,
    compensation: f64,
    limit: usize,
}

impl Default for LogFactorialCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFactorialCache {
    /// Creates a cache holding `ln(0!)` and `ln(1!)` with the default table limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_TABLE_LIMIT)
    }

    /// Creates a cache that tabulates at most `limit + 1` entries.
    ///
    /// A `limit` of zero is raised to one.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            table: vec![0.0, 0.0],
            running_sum: 0.0,
            compensation: 0.0,
            limit: limit.max(1),
        }
    }

    /// Number of tabulated entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always `false`: `ln(0!)` and `ln(1!)` are present from construction.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Largest `k` this cache will ever tabulate.
    #[inline]
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` if `ln(k!)` for every `k <= n` is either tabulated or
    /// past the limit (and therefore evaluated directly).
    #[inline]
    #[must_use]
    pub fn covers(&self, n: u64) -> bool {
        let target = usize::try_from(n).map_or(self.limit, |n| n.min(self.limit));
        target < self.table.len()
    }

    /// Extends the table through `min(n, limit)`. Never shrinks.
    pub fn grow_to(&mut self, n: u64) {
        let target = usize::try_from(n).map_or(self.limit, |n| n.min(self.limit));
        if target < self.table.len() {
            return;
        }

        self.table.reserve(target + 1 - self.table.len());
        let mut sum = self.running_sum;
        let mut compensation = self.compensation;
        for k in self.table.len()..=target {
            #[allow(clippy::cast_precision_loss)]
            let term = (k as f64).ln();
            let next = sum + term;
            if sum.abs() >= term.abs() {
                compensation += (sum - next) + term;
            } else {
                compensation += (term - next) + sum;
            }
            sum = next;
            self.table.push(sum + compensation);
        }
        self.running_sum = sum;
        self.compensation = compensation;
    }

    /// Returns `ln(k!)`.
    ///
    /// Tabulated values cost one array load; larger `k` fall back to
    /// `ln Γ(k + 1)`.
    #[inline]
    #[must_use]
    pub fn ln_factorial(&self, k: u64) -> f64 {
        match usize::try_from(k).ok().and_then(|i| self.table.get(i)) {
            Some(&value) => value,
            #[allow(clippy::cast_precision_loss)]
            None => ln_gamma(k as f64 + 1.0),
        }
    }

    /// Returns `ln C(m, j)`, or negative infinity when `j > m`.
    #[inline]
    #[must_use]
    pub fn ln_binomial(&self, m: u64, j: u64) -> f64 {
        if j > m {
            return f64::NEG_INFINITY;
        }
        self.ln_factorial(m) - self.ln_factorial(j) - self.ln_factorial(m - j)
    }
}

static GLOBAL_CACHE: Lazy<SharedLogFactorialCache> =
    Lazy::new(|| SharedLogFactorialCache::new(LogFactorialCache::new()));

/// A reference-counted handle to the current [`LogFactorialCache`] snapshot.
///
/// Cloning the handle shares the underlying table.
#[derive(Debug, Clone)]
pub struct SharedLogFactorialCache {
    inner: Arc<RwLock<Arc<LogFactorialCache>>>,
}

impl Default for SharedLogFactorialCache {
    fn default() -> Self {
        Self::global()
    }
}

impl SharedLogFactorialCache {
    /// Wraps an existing cache.
    #[must_use]
    pub fn new(cache: LogFactorialCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(cache))),
        }
    }

    /// Creates an empty cache with the given table limit.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self::new(LogFactorialCache::with_limit(limit))
    }

    /// Returns a handle to the process-wide cache.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_CACHE.clone()
    }

    /// Returns `true` if both handles share the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Grows the table to cover `n` and returns a snapshot of it.
    ///
    /// The write lock is only taken when growth is needed, and no lock is held
    /// once this returns. The snapshot is `Sync`, so it can be handed to every
    /// worker of a parallel batch, and it never changes under its holder.
    pub fn reserve(&self, n: u64) -> Arc<LogFactorialCache> {
        // The table is always left consistent, so a poisoned lock is safe to reuse.
        let current = Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner));
        if current.covers(n) {
            return current;
        }
        drop(current);

        let mut slot = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !slot.covers(n) {
            let from = slot.len();
            // Copies the table only if an older snapshot is still in use.
            let cache = Arc::make_mut(&mut slot);
            cache.grow_to(n);
            tracing::debug!(from, to = cache.len(), requested = n, "extended log-factorial table");
        }
        Arc::clone(&slot)
    }

    /// Number of tabulated entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Always `false`; see [`LogFactorialCache::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
