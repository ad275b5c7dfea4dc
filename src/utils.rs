//! utils — conversion helpers for the Python bindings.
//!
//! Everything here is compiled only with the `python-bindings` feature and
//! turns loosely-typed Python inputs (numpy arrays, pandas objects, plain
//! sequences) into the validated Rust types the core modules expect.
#[cfg(feature = "python-bindings")]
use pyo3::{
    exceptions::{PyTypeError, PyValueError},
    prelude::*,
    types::PyAny,
};

#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec / Array → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
    PyReadonlyArray2,
};

#[cfg(feature = "python-bindings")]
use crate::{
    assessment::coalesce::FitObs,
    optimization::minimizer::{LineSearcher, MinimizerOptions, Tolerances},
};

/// Contiguous 1-D `float64` view of a numpy array, pandas Series, or
/// sequence of floats.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray1<f64>>() {
        if arr.as_slice().is_ok() {
            return Ok(arr);
        }
    }
    if let Ok(obj) = raw.call_method("to_numpy", (false,), None) {
        if let Ok(series) = obj.extract::<PyReadonlyArray1<f64>>() {
            return Ok(series);
        }
    }
    let vec: Vec<f64> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64")
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// 2-D `float64` view of a numpy array, pandas DataFrame, or list of rows.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_matrix<'py>(
    py: Python<'py>, raw: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray2<'py, f64>> {
    if let Ok(arr) = raw.extract::<PyReadonlyArray2<f64>>() {
        return Ok(arr);
    }
    if let Ok(obj) = raw.call_method("to_numpy", (), None) {
        if let Ok(frame) = obj.extract::<PyReadonlyArray2<f64>>() {
            return Ok(frame);
        }
    }
    let rows: Vec<Vec<f64>> = raw.extract().map_err(|_| {
        PyTypeError::new_err("expected a 2-D numpy.ndarray, pandas.DataFrame, or list of rows")
    })?;
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|r| r.len() != ncols) {
        return Err(PyValueError::new_err("rows must all have the same length"));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let matrix = Array2::from_shape_vec((flat.len() / ncols.max(1), ncols), flat)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(matrix.into_pyarray(py).readonly())
}

/// Build a validated `(fit, obs)` pair from two Python vectors.
#[cfg(feature = "python-bindings")]
pub fn extract_fit_obs<'py>(
    py: Python<'py>, fit: &Bound<'py, PyAny>, obs: &Bound<'py, PyAny>,
) -> PyResult<FitObs> {
    let fit = extract_f64_array(py, fit)?;
    let obs = extract_f64_array(py, obs)?;
    Ok(FitObs::new(fit.as_array().to_owned(), obs.as_array().to_owned())?)
}

/// Minimizer options from optional Python keyword arguments.
#[cfg(feature = "python-bindings")]
pub fn extract_minimizer_opts(
    tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
    target_cost: Option<f64>,
) -> PyResult<MinimizerOptions> {
    let mut tols = Tolerances::new(tol_cost, max_iter)?;
    if let Some(target) = target_cost {
        tols = tols.with_target_cost(target)?;
    }
    let line_searcher = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => LineSearcher::default(),
    };
    Ok(MinimizerOptions::new(tols, line_searcher, None, false)?)
}
