//! model_calibration — bias correction and fit assessment for fitted
//! classifiers, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the two core operations to Python via the `_model_calibration`
//! extension module:
//! - [`bias::correct_bias`]: shift a softmax classifier's output biases so
//!   its average class shares match known population rates, and persist the
//!   adjusted model copy-on-write.
//! - [`assessment::slice_and_assess`]: KS, decile table, R², and segment
//!   means of model output against observed outcomes, overall and per
//!   level of a feature.
//!
//! Key behaviors
//! -------------
//! - Re-export the core modules: `optimization` (Newton-CG minimizer),
//!   `bias`, `assessment`, and the collaborator seams `model` and `data`.
//! - Every fallible operation returns a typed error whose `kind()` is an
//!   [`errors::ErrorKind`]: input quality, configuration, convergence, or
//!   persistence.
//! - Logging goes through an injected `slog::Logger`; see [`logging`].
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work lives in the inner modules; this file only performs
//!   FFI glue and error mapping.
//! - Computation is single-threaded and synchronous. The only mutation of
//!   shared state is the one-time output-bias patch in `correct_bias`.
//!
//! Conventions
//! -----------
//! - Python-exposed classes live under `_model_calibration.<submodule>`;
//!   Rust errors become `ValueError` at the PyO3 boundary.

pub mod assessment;
pub mod bias;
pub mod data;
pub mod errors;
pub mod logging;
pub mod model;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    assessment::{decile::decile_table as build_decile_table, ks::KsOutcome},
    bias::{
        log_odds::LogOddsMatrix,
        optimizer::{BiasSolution, solve_bias},
        probabilities::ProbabilityMatrix,
        target_rates::TargetRates,
        validation::DEFAULT_RATE_TOLERANCE,
    },
    logging::discard_logger,
    utils::{extract_f64_array, extract_f64_matrix, extract_fit_obs, extract_minimizer_opts},
};

/// KolmogorovSmirnov — Python-facing KS statistic of a score against a
/// 0/1 (or fractional) outcome.
///
/// Constructed from Python via `KolmogorovSmirnov(fit, obs)`; both inputs
/// are 1-D float arrays of equal length with `obs` in [0, 1].
#[cfg(feature = "python-bindings")]
#[pyclass(module = "model_calibration.assessment")]
pub struct KolmogorovSmirnov {
    inner: KsOutcome,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl KolmogorovSmirnov {
    #[new]
    #[pyo3(text_signature = "(fit, obs, /)")]
    pub fn new<'py>(
        py: Python<'py>, fit: &Bound<'py, PyAny>, obs: &Bound<'py, PyAny>,
    ) -> PyResult<Self> {
        let pair = extract_fit_obs(py, fit, obs)?;
        Ok(Self { inner: assessment::ks::ks_statistic(&pair)? })
    }

    /// Maximum CDF gap in percent.
    #[getter]
    pub fn statistic(&self) -> f64 {
        self.inner.statistic
    }

    #[getter]
    pub fn score_at_max(&self) -> f64 {
        self.inner.score_at_max
    }

    #[getter]
    pub fn scores(&self) -> Vec<f64> {
        self.inner.scores.clone()
    }

    #[getter]
    pub fn positive_cdf(&self) -> Vec<f64> {
        self.inner.positive_cdf.clone()
    }

    #[getter]
    pub fn negative_cdf(&self) -> Vec<f64> {
        self.inner.negative_cdf.clone()
    }
}

/// Decile table as `(bucket, count, mean_fit, mean_obs)` tuples, highest
/// scores first.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(fit, obs, /)")]
pub fn decile_table<'py>(
    py: Python<'py>, fit: &Bound<'py, PyAny>, obs: &Bound<'py, PyAny>,
) -> PyResult<Vec<(usize, usize, f64, f64)>> {
    let pair = extract_fit_obs(py, fit, obs)?;
    let table = build_decile_table(&pair)?;
    Ok(table.rows.iter().map(|r| (r.bucket, r.count, r.mean_fit, r.mean_obs)).collect())
}

/// Coefficient of determination of `fit` against `obs`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(text_signature = "(fit, obs, /)")]
pub fn r_squared<'py>(
    py: Python<'py>, fit: &Bound<'py, PyAny>, obs: &Bound<'py, PyAny>,
) -> PyResult<f64> {
    let pair = extract_fit_obs(py, fit, obs)?;
    Ok(assessment::r_squared::r_squared(&pair)?)
}

/// BiasAdjustment — Python-facing bias solve on precomputed probabilities.
///
/// Constructed via `BiasAdjustment(probabilities, targets, tol_cost=1e-14,
/// max_iter=None, line_searcher=None, target_cost=1e-12)`:
/// - `probabilities`: `n × m` softmax output, rows summing to one.
/// - `targets`: `m` target class shares in (0, 1) summing to one.
///
/// Only the adjustment is computed; patching and persisting a model is a
/// Rust-side operation.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "model_calibration.bias")]
pub struct BiasAdjustment {
    inner: BiasSolution,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl BiasAdjustment {
    #[new]
    #[pyo3(
        text_signature = "(probabilities, targets, /, tol_cost=1e-14, max_iter=None, line_searcher=None, target_cost=1e-12)",
        signature = (
            probabilities,
            targets,
            tol_cost = Some(bias::DEFAULT_COST_TOLERANCE),
            max_iter = None,
            line_searcher = None,
            target_cost = Some(bias::DEFAULT_TARGET_SSE)
        )
    )]
    pub fn new<'py>(
        py: Python<'py>, probabilities: &Bound<'py, PyAny>, targets: &Bound<'py, PyAny>,
        tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
        target_cost: Option<f64>,
    ) -> PyResult<Self> {
        let probs = extract_f64_matrix(py, probabilities)?;
        let probs = ProbabilityMatrix::new(probs.as_array().to_owned())?;
        let rates = extract_f64_array(py, targets)?;
        let rates =
            TargetRates::new(rates.as_array().to_owned(), probs.ncols(), DEFAULT_RATE_TOLERANCE)?;
        let opts = extract_minimizer_opts(tol_cost, max_iter, line_searcher, target_cost)?;
        let log_odds = LogOddsMatrix::from_probabilities(&probs)?;
        let inner = solve_bias(&log_odds, rates, &opts, &discard_logger())?;
        Ok(Self { inner })
    }

    /// Shift per non-reference class (`m − 1` entries).
    #[getter]
    pub fn adjustment(&self) -> Vec<f64> {
        self.inner.adjustment.to_vec()
    }

    #[getter]
    pub fn sse(&self) -> f64 {
        self.inner.sse
    }

    #[getter]
    pub fn sse_at_zero(&self) -> f64 {
        self.inner.sse_at_zero
    }

    /// Average class shares after the shift.
    #[getter]
    pub fn average_probabilities(&self) -> Vec<f64> {
        self.inner.average_probabilities.to_vec()
    }

    /// Newton iterations; 0 when the starting point already met the target.
    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.outcome.as_ref().map_or(0, |o| o.iterations)
    }
}

#[cfg(feature = "python-bindings")]
#[pymodule]
fn _model_calibration<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let assessment_mod = PyModule::new(_py, "assessment")?;
    let bias_mod = PyModule::new(_py, "bias")?;
    assessment_module(_py, m, &assessment_mod)?;
    bias_module(_py, m, &bias_mod)?;

    // Manually add submodules into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("model_calibration.assessment", assessment_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("model_calibration.bias", bias_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn assessment_module<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<KolmogorovSmirnov>()?;
    m.add_function(wrap_pyfunction!(decile_table, m)?)?;
    m.add_function(wrap_pyfunction!(r_squared, m)?)?;
    root.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn bias_module<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<BiasAdjustment>()?;
    root.add_submodule(m)?;
    Ok(())
}
