//! bias::probabilities — the classifier's per-row class probabilities.
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::bias::{
    errors::{BiasError, BiasResult},
    validation::validate_probability_rows,
};

/// `n × m` softmax output, validated once and immutable afterwards.
///
/// Column `m − 1` is the reference class for the log-odds transform.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMatrix {
    values: Array2<f64>,
}

impl ProbabilityMatrix {
    /// # Errors
    /// - `BiasError::EmptyProbabilities` / `BiasError::InvalidProbabilities`
    ///   from [`validate_probability_rows`].
    pub fn new(values: Array2<f64>) -> BiasResult<Self> {
        validate_probability_rows(values.view())?;
        Ok(Self { values })
    }

    /// Build from row vectors.
    ///
    /// # Errors
    /// - `BiasError::InvalidProbabilities` if rows have different lengths.
    /// - Anything [`ProbabilityMatrix::new`] rejects.
    pub fn from_rows(rows: &[Vec<f64>]) -> BiasResult<Self> {
        let m = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().position(|r| r.len() != m) {
            return Err(BiasError::InvalidProbabilities {
                row,
                reason: format!("expected {m} columns, found {}", rows[row].len()),
            });
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = Array2::from_shape_vec((rows.len(), m), flat).map_err(|e| {
            BiasError::InvalidProbabilities { row: 0, reason: e.to_string() }
        })?;
        Self::new(values)
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Mean probability per class, `mean_i p(i,j)`.
    pub fn column_means(&self) -> Array1<f64> {
        // n > 0 is guaranteed by validation.
        self.values.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(self.ncols()))
    }
}
