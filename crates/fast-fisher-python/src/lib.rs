//! Python bindings for the fast-fisher exact test.
//!
//! Exposes the batch API to Python via `PyO3` with `NumPy` arrays. Each
//! function takes four equal-length 1-D `uint64` arrays `a`, `b`, `c`, `d`,
//! where index `i` is the table `[[a[i], b[i]], [c[i], d[i]]]`. The GIL is
//! released while tables are evaluated.
//!
//! ```python
//! import numpy as np
//! import faster_fishers
//!
//! a = np.array([1, 3], dtype=np.uint64)
//! b = np.array([2, 5], dtype=np.uint64)
//! c = np.array([1, 4], dtype=np.uint64)
//! d = np.array([5, 50], dtype=np.uint64)
//! p = faster_fishers.exact(a, b, c, d, alternative="greater")
//! ```

// PyO3 requires pass-by-value for Python interop
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::type_complexity)]

use fast_fisher::Alternative;
use numpy::{PyArray1, PyArrayMethods, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Convert fast-fisher error to Python `ValueError`
fn to_py_err(e: fast_fisher::Error) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn parse_alternative(alternative: &str) -> PyResult<Alternative> {
    alternative.parse::<Alternative>().map_err(to_py_err)
}

/// Fisher exact test p-values for a batch of 2x2 tables.
///
/// Args:
///     a, b, c, d: Cell counts (`NumPy` arrays of uint64, equal length)
///     alternative: "less", "greater" or "two-sided"
///     out: Optional pre-allocated float64 array for zero-copy writes
///
/// Returns:
///     `NumPy` array of p-values, one per table
///
/// Raises:
///     `ValueError`: on mismatched lengths, an unknown alternative, an
///     overflowing table total, or an `out` array that is too short
#[pyfunction]
#[pyo3(signature = (a, b, c, d, alternative="two-sided", out=None))]
fn exact<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<'py, u64>,
    b: PyReadonlyArray1<'py, u64>,
    c: PyReadonlyArray1<'py, u64>,
    d: PyReadonlyArray1<'py, u64>,
    alternative: &str,
    out: Option<Bound<'py, PyArray1<f64>>>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let alternative = parse_alternative(alternative)?;
    let (a, b, c, d) = (a.as_slice()?, b.as_slice()?, c.as_slice()?, d.as_slice()?);

    if let Some(output) = out {
        // SAFETY: We have exclusive access during this function call
        let slice = unsafe { output.as_slice_mut()? };
        py.allow_threads(|| fast_fisher::exact_into(a, b, c, d, alternative, slice))
            .map_err(to_py_err)?;
        Ok(output)
    } else {
        let result = py
            .allow_threads(|| fast_fisher::exact(a, b, c, d, alternative))
            .map_err(to_py_err)?;
        Ok(PyArray1::from_vec_bound(py, result))
    }
}

/// Sample odds ratios and p-values for a batch of 2x2 tables.
///
/// Args:
///     a, b, c, d: Cell counts (`NumPy` arrays of uint64, equal length)
///     alternative: "less", "greater" or "two-sided"
///
/// Returns:
///     Tuple of (`odds_ratios`, `p_values`) `NumPy` arrays. An odds ratio is
///     inf when only its denominator is zero and NaN when both parts are.
#[pyfunction]
#[pyo3(signature = (a, b, c, d, alternative="two-sided"))]
fn exact_with_odds_ratios<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<'py, u64>,
    b: PyReadonlyArray1<'py, u64>,
    c: PyReadonlyArray1<'py, u64>,
    d: PyReadonlyArray1<'py, u64>,
    alternative: &str,
) -> PyResult<(Bound<'py, PyArray1<f64>>, Bound<'py, PyArray1<f64>>)> {
    let alternative = parse_alternative(alternative)?;
    let (a, b, c, d) = (a.as_slice()?, b.as_slice()?, c.as_slice()?, d.as_slice()?);

    let (odds_ratios, p_values) = py
        .allow_threads(|| fast_fisher::exact_with_odds_ratios(a, b, c, d, alternative))
        .map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec_bound(py, odds_ratios),
        PyArray1::from_vec_bound(py, p_values),
    ))
}

/// p-values under all three alternatives.
///
/// Args:
///     a, b, c, d: Cell counts (`NumPy` arrays of uint64, equal length)
///
/// Returns:
///     Tuple of (less, greater, `two_sided`) `NumPy` arrays
#[pyfunction]
fn exact_all<'py>(
    py: Python<'py>,
    a: PyReadonlyArray1<'py, u64>,
    b: PyReadonlyArray1<'py, u64>,
    c: PyReadonlyArray1<'py, u64>,
    d: PyReadonlyArray1<'py, u64>,
) -> PyResult<(
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
    Bound<'py, PyArray1<f64>>,
)> {
    let (a, b, c, d) = (a.as_slice()?, b.as_slice()?, c.as_slice()?, d.as_slice()?);

    let (less, greater, two_sided) = py
        .allow_threads(|| fast_fisher::exact_all(a, b, c, d))
        .map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec_bound(py, less),
        PyArray1::from_vec_bound(py, greater),
        PyArray1::from_vec_bound(py, two_sided),
    ))
}

#[pymodule]
fn faster_fishers(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(exact, m)?)?;
    m.add_function(wrap_pyfunction!(exact_with_odds_ratios, m)?)?;
    m.add_function(wrap_pyfunction!(exact_all, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
