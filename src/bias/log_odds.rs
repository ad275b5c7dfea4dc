//! bias::log_odds — log-odds relative to the reference class and the
//! inverse re-softmax.
//!
//! Purpose
//! -------
//! Turn an `n × m` probability matrix into the `n × (m − 1)` matrix
//! `L(i, j) = ln(p(i, j) / p(i, m − 1))`, and map shifted log-odds `L + b`
//! back to probabilities for the bias objective.
//!
//! Key behaviors
//! -------------
//! - [`LogOddsMatrix::from_probabilities`] rejects saturated rows: any
//!   numerator or reference probability outside (0, 1) is a
//!   `DegenerateProbability` error, never a silent `±inf`.
//! - [`LogOddsMatrix::resoftmax`] evaluates
//!   `p*(i, j) = exp(L + b) / (1 + Σ exp(L + b))` with a per-row max shift
//!   so large log-odds cannot overflow. With `b = 0` it reproduces the input
//!   probabilities up to rounding.
//!
//! Numerical notes
//! ---------------
//! - All reductions go through `ndarray` (`sum_axis`, `fold_axis`), which
//!   do not promise a sequential summation order. Column sums and averaged
//!   probabilities can therefore differ from a naive row-by-row loop in the
//!   last few ulps; no caller depends on bit-exact reductions.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};

use crate::bias::{
    errors::{BiasError, BiasResult},
    probabilities::ProbabilityMatrix,
};

/// `n × (m − 1)` log-odds against the last class, with column sums cached
/// for the closed-form starting point.
#[derive(Debug, Clone, PartialEq)]
pub struct LogOddsMatrix {
    values: Array2<f64>,
    column_sums: Array1<f64>,
}

impl LogOddsMatrix {
    /// Transform validated probabilities into log-odds.
    ///
    /// # Errors
    /// - `BiasError::NotCategorical` when `m < 2`.
    /// - `BiasError::DegenerateProbability` for the first entry (row-major)
    ///   in a numerator or reference column that is `≤ 0` or `≥ 1`.
    pub fn from_probabilities(probs: &ProbabilityMatrix) -> BiasResult<Self> {
        let p = probs.view();
        let m = p.ncols();
        if m < 2 {
            return Err(BiasError::NotCategorical { classes: m });
        }
        check_open_interval(p)?;

        let reference = p.column(m - 1);
        let mut values = p.slice(ndarray::s![.., ..m - 1]).to_owned();
        Zip::from(values.rows_mut()).and(&reference).for_each(|mut row, &r| {
            row.mapv_inplace(|x| (x / r).ln());
        });
        let column_sums = values.sum_axis(Axis(0));
        Ok(Self { values, column_sums })
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of free (non-reference) classes, `m − 1`.
    pub fn dim(&self) -> usize {
        self.values.ncols()
    }

    /// Number of classes including the reference, `m`.
    pub fn classes(&self) -> usize {
        self.values.ncols() + 1
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// `Σ_i L(i, j)` for each free class `j`.
    pub fn column_sums(&self) -> ArrayView1<'_, f64> {
        self.column_sums.view()
    }

    /// Re-softmax the shifted log-odds `L + b` into an `n × m` matrix.
    ///
    /// # Errors
    /// - `BiasError::BiasLengthMismatch` unless `b.len() == m − 1`.
    pub fn resoftmax(&self, b: ArrayView1<'_, f64>) -> BiasResult<Array2<f64>> {
        let dim = self.dim();
        if b.len() != dim {
            return Err(BiasError::BiasLengthMismatch { expected: dim, found: b.len() });
        }
        let shifted = &self.values + &b;
        // Per-row shift c_i = max(0, max_j s_ij); 0 stands for the reference.
        let shift = shifted.fold_axis(Axis(1), 0.0_f64, |&acc, &x| acc.max(x));

        let mut out = Array2::<f64>::zeros((self.nrows(), dim + 1));
        Zip::from(out.rows_mut()).and(shifted.rows()).and(&shift).for_each(|mut o, s, &c| {
            let reference = (-c).exp();
            let mut denom = reference;
            for (oj, &sj) in o.iter_mut().zip(s.iter()) {
                *oj = (sj - c).exp();
                denom += *oj;
            }
            o[dim] = reference;
            o /= denom;
        });
        Ok(out)
    }

    /// Column means of [`LogOddsMatrix::resoftmax`], i.e. `avgP(j; b)`.
    ///
    /// # Errors
    /// - `BiasError::BiasLengthMismatch` unless `b.len() == m − 1`.
    pub fn average_probabilities(&self, b: ArrayView1<'_, f64>) -> BiasResult<Array1<f64>> {
        let n = self.nrows() as f64;
        Ok(self.resoftmax(b)?.sum_axis(Axis(0)) / n)
    }
}

fn check_open_interval(p: ArrayView2<'_, f64>) -> BiasResult<()> {
    for ((row, col), &value) in p.indexed_iter() {
        if !(value > 0.0 && value < 1.0) {
            return Err(BiasError::DegenerateProbability { row, col, value });
        }
    }
    Ok(())
}
