//! Streaming log-sum-exp accumulator.
//!
//! Tail probabilities of large tables are sums of masses spanning hundreds of
//! orders of magnitude. Summing `exp(ln p)` directly underflows the small
//! terms and loses the large ones to rounding; [`LogSumExp`] instead keeps the
//! running sum scaled by its largest term.
//!
//! # Algorithm
//!
//! ```text
//! state: (max, scaled)   with   sum = exp(max) * scaled
//!
//! push(x):
//!   if x <= max:  scaled += exp(x - max)
//!   else:         scaled = scaled * exp(max - x) + 1;  max = x
//! ```
//!
//! Each push is O(1) and the largest term is always added exactly as `1.0`.
//!
//! # Example
//!
//! ```
//! use fast_fisher::kernels::log_sum_exp::LogSumExp;
//!
//! let mut acc = LogSumExp::new();
//! acc.push(0.25_f64.ln());
//! acc.push(0.5_f64.ln());
//! assert!((acc.sum() - 0.75).abs() < 1e-14);
//!
//! // Terms far below f64's range still combine correctly.
//! let mut tiny = LogSumExp::new();
//! tiny.push(-2000.0);
//! tiny.push(-2000.0);
//! assert!((tiny.ln_sum() - (-2000.0 + 2.0_f64.ln())).abs() < 1e-12);
//! ```

/// Running sum of values supplied in log space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogSumExp {
    max: f64,
    scaled: f64,
}

impl Default for LogSumExp {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSumExp {
    /// An empty sum (`ln 0 = -inf`).
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max: f64::NEG_INFINITY,
            scaled: 0.0,
        }
    }

    /// Adds `exp(ln_value)` to the sum.
    #[inline]
    pub fn push(&mut self, ln_value: f64) {
        if ln_value == f64::NEG_INFINITY || ln_value.is_nan() {
            return;
        }
        if ln_value <= self.max {
            self.scaled += (ln_value - self.max).exp();
        } else {
            self.scaled = self.scaled * (self.max - ln_value).exp() + 1.0;
            self.max = ln_value;
        }
    }

    /// Merges another accumulator into this one.
    #[inline]
    pub fn merge(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }
        if other.max <= self.max {
            self.scaled += other.scaled * (other.max - self.max).exp();
        } else {
            self.scaled = self.scaled * (self.max - other.max).exp() + other.scaled;
            self.max = other.max;
        }
    }

    /// `true` if nothing but zeros has been pushed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.max == f64::NEG_INFINITY
    }

    /// The sum in log space.
    #[inline]
    #[must_use]
    pub fn ln_sum(&self) -> f64 {
        if self.is_empty() {
            f64::NEG_INFINITY
        } else {
            self.max + self.scaled.ln()
        }
    }

    /// The sum, exponentiated.
    #[inline]
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.ln_sum().exp()
    }
}
